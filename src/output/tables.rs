use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::domain::JobStatus;

use super::styling::job_status_label;

pub fn create_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .iter()
                .map(|label| Cell::new(*label).fg(TableColor::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn job_status_cell(status: JobStatus) -> Cell {
    let cell = Cell::new(job_status_label(status));
    match status {
        JobStatus::Succeeded => cell.fg(TableColor::Green),
        JobStatus::Failed | JobStatus::Incomplete => cell.fg(TableColor::Red),
        JobStatus::Pending | JobStatus::Running => cell.fg(TableColor::Yellow),
        JobStatus::Cancelled | JobStatus::Unknown => cell,
    }
}
