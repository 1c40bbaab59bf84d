use std::fmt::Write;

use comfy_table::Cell;

use crate::api::form_error_message;
use crate::domain::{JobWithAttempts, Source, User};
use crate::error::SyncLensError;
use crate::failure::resolve_failure_message;
use crate::i18n::MessageCatalog;

use super::styling::{
    bright, bright_green, bright_red, bright_yellow, cyan, dim, user_status_label,
};
use super::tables::{create_table, job_status_cell};

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

/// Failure details line, indented under the job it belongs to. Empty when
/// there is nothing to show.
pub fn render_failure(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!("    {}", dim(m)))
}

pub fn print_failure(message: Option<&str>) {
    let rendered = render_failure(message);
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}

pub fn render_jobs<C>(jobs: &[JobWithAttempts], catalog: &C) -> String
where
    C: MessageCatalog + ?Sized,
{
    let mut output = String::new();
    add_section_header(&mut output, "📋", &catalog.lookup("jobs.title"));

    if jobs.is_empty() {
        let _ = writeln!(output, "  {}", bright_yellow(catalog.lookup("jobs.noJobs")));
        return output;
    }

    let failure_header = catalog.lookup("jobs.lastFailure");
    let mut table = create_table(&[
        "Job",
        "Type",
        "Status",
        "Created",
        "Attempts",
        failure_header.as_str(),
    ]);

    for entry in jobs {
        let created = entry
            .job
            .created_at_utc()
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_default();
        let failure =
            resolve_failure_message(Some(entry.attempts.as_slice()), catalog).unwrap_or_default();

        table.add_row(vec![
            Cell::new(entry.job.id),
            Cell::new(&entry.job.config_type),
            job_status_cell(entry.job.status),
            Cell::new(created),
            Cell::new(entry.attempts.len()),
            Cell::new(failure),
        ]);
    }

    let _ = writeln!(output, "{table}");
    output
}

pub fn print_jobs<C>(jobs: &[JobWithAttempts], catalog: &C)
where
    C: MessageCatalog + ?Sized,
{
    println!("{}", render_jobs(jobs, catalog));
}

pub fn render_users<C>(users: &[User], catalog: &C) -> String
where
    C: MessageCatalog + ?Sized,
{
    let mut output = String::new();
    add_section_header(&mut output, "👥", &catalog.lookup("users.title"));

    if users.is_empty() {
        let _ = writeln!(output, "  {}", bright_yellow(catalog.lookup("users.noUsers")));
        return output;
    }

    let mut table = create_table(&["Name", "Email", "Status", "User ID"]);
    for user in users {
        table.add_row(vec![
            Cell::new(&user.name),
            Cell::new(&user.email),
            Cell::new(user_status_label(user.status)),
            Cell::new(&user.user_id),
        ]);
    }

    let _ = writeln!(output, "{table}");
    output
}

pub fn print_users<C>(users: &[User], catalog: &C)
where
    C: MessageCatalog + ?Sized,
{
    println!("{}", render_users(users, catalog));
}

pub fn print_source<C>(source: &Source, catalog: &C)
where
    C: MessageCatalog + ?Sized,
{
    println!(
        "{} {} {}",
        bright_green(catalog.lookup("sources.created")),
        cyan(&source.name),
        dim(format!("({})", source.source_id))
    );
}

/// Error block for a failed source submit: the form message followed by the
/// log lines of the job the server attached, if any.
pub fn render_form_error<C>(error: &SyncLensError, catalog: &C) -> Option<String>
where
    C: MessageCatalog + ?Sized,
{
    let message = form_error_message(error, catalog)?;
    let mut output = format!("{}\n", bright_red(message));

    if let Some(job_info) = error.job_info() {
        let _ = writeln!(output, "  {}", bright(catalog.lookup("sources.jobLogs")));
        for line in &job_info.logs.log_lines {
            let _ = writeln!(output, "    {}", dim(line));
        }
    }

    Some(output)
}

/// Shown instead of the form when the connector specification can't be loaded.
pub fn render_connector_error<C>(error: &SyncLensError, catalog: &C) -> String
where
    C: MessageCatalog + ?Sized,
{
    format!(
        "{}\n    {}\n",
        bright_red(catalog.lookup("sources.fetchingConnectorError")),
        dim(error)
    )
}

pub fn print_connector_error<C>(error: &SyncLensError, catalog: &C)
where
    C: MessageCatalog + ?Sized,
{
    eprint!("{}", render_connector_error(error, catalog));
}

pub fn print_form_error<C>(error: &SyncLensError, catalog: &C)
where
    C: MessageCatalog + ?Sized,
{
    if let Some(rendered) = render_form_error(error, catalog) {
        eprint!("{rendered}");
    }
}
