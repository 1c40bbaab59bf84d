use console::{style, StyledObject};

use crate::domain::{JobStatus, UserStatus};

pub fn bright_yellow(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn bright_green(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn bright_red(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().red()
}

pub fn cyan(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn dim(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn bright(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

pub fn job_status_label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "pending",
        JobStatus::Running => "running",
        JobStatus::Incomplete => "incomplete",
        JobStatus::Failed => "failed",
        JobStatus::Succeeded => "succeeded",
        JobStatus::Cancelled => "cancelled",
        JobStatus::Unknown => "unknown",
    }
}

pub fn user_status_label(status: Option<UserStatus>) -> &'static str {
    match status {
        Some(UserStatus::Invited) => "invited",
        Some(UserStatus::Registered) => "registered",
        Some(UserStatus::Disabled) => "disabled",
        Some(UserStatus::Unknown) => "unknown",
        None => "-",
    }
}
