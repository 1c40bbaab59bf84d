mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::Spinner;
use styling::{dim, magenta_bold};
pub use summary::{
    print_connector_error, print_failure, print_form_error, print_jobs, print_source, print_users,
};

/// Prints the synclens banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔁 synclens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Sync job & workspace console")
    );
}
