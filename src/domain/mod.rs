mod job;
mod source;
mod user;

pub use job::{Attempt, Failure, JobInfo, JobStatus, JobWithAttempts, SynchronousJobInfo};
pub use source::{Source, SourceCreate, SourceDefinition, SourceDefinitionSpecification};
pub use user::{User, UserCreate, UserStatus};

// Reached through the types above outside of tests
#[cfg(test)]
pub use job::{AttemptInfo, AttemptStatus, FailureSummary, Job, LogRead};
