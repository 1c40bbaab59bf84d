use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a job as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Incomplete,
    Failed,
    Succeeded,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Status of a single attempt within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Running,
    Failed,
    Succeeded,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A job run for a connection (sync, reset, check, ...).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    pub id: i64,
    /// Kind of job, e.g. "sync" or "reset_connection"
    pub config_type: String,
    /// Id of the connection or connector the job belongs to
    pub config_id: String,
    pub status: JobStatus,
    /// Epoch seconds
    pub created_at: i64,
    /// Epoch seconds
    pub updated_at: i64,
}

/// One execution attempt of a job.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Attempt {
    pub id: i64,
    pub status: AttemptStatus,
    /// Epoch seconds
    pub created_at: i64,
    /// Epoch seconds
    pub updated_at: i64,
    /// Epoch seconds, absent while the attempt is running
    pub ended_at: Option<i64>,
    pub bytes_synced: Option<u64>,
    pub records_synced: Option<u64>,
    pub failure_summary: Option<FailureSummary>,
}

/// Failures recorded during one attempt, in the order they were reported.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FailureSummary {
    pub failures: Vec<Failure>,
    pub partial_success: Option<bool>,
}

/// A single recorded fault.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Failure {
    /// Component that failed (e.g. "source", "destination", "replication")
    pub failure_origin: Option<String>,
    /// Failure classification (e.g. "config_error", "system_error")
    pub failure_type: Option<String>,
    /// User-facing message
    pub external_message: Option<String>,
    /// Free-form diagnostic text
    pub internal_message: Option<String>,
    pub stacktrace: Option<String>,
    pub retryable: Option<bool>,
    /// Epoch milliseconds
    pub timestamp: Option<i64>,
}

/// Job together with its attempts, as returned by `v1/jobs/list`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobWithAttempts {
    pub job: Job,
    pub attempts: Vec<Attempt>,
}

/// Job detail returned by `v1/jobs/get`, attempts wrapped with their logs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInfo {
    pub job: Job,
    pub attempts: Vec<AttemptInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AttemptInfo {
    pub attempt: Attempt,
    pub logs: LogRead,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LogRead {
    pub log_lines: Vec<String>,
}

/// Result of a synchronous job (connection check, discover) that some
/// error responses carry alongside the message.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SynchronousJobInfo {
    pub id: String,
    pub config_type: String,
    pub config_id: Option<String>,
    /// Epoch seconds
    pub created_at: i64,
    /// Epoch seconds
    pub ended_at: i64,
    pub succeeded: bool,
    pub logs: LogRead,
}

fn epoch_to_utc(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

impl Job {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        epoch_to_utc(self.created_at)
    }
}

impl Attempt {
    /// First failure recorded for this attempt.
    pub fn first_failure(&self) -> Option<&Failure> {
        self.failure_summary.as_ref()?.failures.first()
    }
}

impl JobInfo {
    /// Drops the per-attempt logs.
    pub fn into_job_with_attempts(self) -> JobWithAttempts {
        JobWithAttempts {
            job: self.job,
            attempts: self.attempts.into_iter().map(|info| info.attempt).collect(),
        }
    }
}
