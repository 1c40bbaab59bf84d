mod client;
mod jobs;
mod sources;
mod users;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use jobs::JobService;
pub use sources::{find_definition, form_error_message, SourceService};
pub use users::UserService;
