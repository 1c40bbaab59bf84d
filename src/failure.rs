use serde_json::Value;

use crate::domain::{Attempt, Failure, JobInfo, JobWithAttempts};
use crate::error::{Result, SyncLensError};
use crate::i18n::MessageCatalog;

/// Builds the "additional failure info" line for a job.
///
/// Only the first failure of the most recent attempt is considered. Returns
/// `None` when there are no attempts or that attempt recorded no failure.
pub fn resolve_failure_message<C>(attempts: Option<&[Attempt]>, catalog: &C) -> Option<String>
where
    C: MessageCatalog + ?Sized,
{
    let failure = attempts?.last()?.first_failure()?;
    Some(internal_failure_message(failure, catalog))
}

fn internal_failure_message<C>(failure: &Failure, catalog: &C) -> String
where
    C: MessageCatalog + ?Sized,
{
    let message = failure
        .internal_message
        .clone()
        .unwrap_or_else(|| catalog.lookup("errorView.unknown"));

    format!(
        "{}: {message}",
        catalog.lookup("sources.additionalFailureInfo")
    )
}

/// Reads attempts from a JSON document.
///
/// Accepts a bare array of attempts, a job with attempts (`v1/jobs/list`
/// entries) or a job detail whose attempts are wrapped with their logs
/// (`v1/jobs/get`).
pub fn attempts_from_json(contents: &str) -> Result<Vec<Attempt>> {
    let value: Value = serde_json::from_str(contents)?;

    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }

    let Some(attempts) = value.get("attempts").and_then(Value::as_array) else {
        return Err(SyncLensError::InvalidInput(
            "expected an array of attempts or an object with an \"attempts\" array".to_string(),
        ));
    };

    let wrapped = attempts
        .first()
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("attempt"));

    if wrapped {
        let info: JobInfo = serde_json::from_value(value)?;
        Ok(info.into_job_with_attempts().attempts)
    } else {
        let job: JobWithAttempts = serde_json::from_value(value)?;
        Ok(job.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureSummary;
    use crate::i18n::Catalog;

    fn attempt_with(failures: Option<Vec<Failure>>) -> Attempt {
        Attempt {
            failure_summary: failures.map(|failures| FailureSummary {
                failures,
                partial_success: None,
            }),
            ..Attempt::default()
        }
    }

    fn failure(internal_message: Option<&str>) -> Failure {
        Failure {
            internal_message: internal_message.map(ToString::to_string),
            ..Failure::default()
        }
    }

    #[test]
    fn returns_none_without_attempts() {
        let catalog = Catalog::english();
        assert_eq!(resolve_failure_message(None, &catalog), None);
        assert_eq!(resolve_failure_message(Some(&[][..]), &catalog), None);
    }

    #[test]
    fn returns_none_without_failure_summary() {
        let attempts = vec![attempt_with(None)];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()),
            None
        );
    }

    #[test]
    fn returns_none_with_empty_failure_list() {
        let attempts = vec![attempt_with(Some(vec![]))];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()),
            None
        );
    }

    #[test]
    fn formats_internal_message() {
        let attempts = vec![attempt_with(Some(vec![failure(Some("disk full"))]))];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()).as_deref(),
            Some("Additional failure info: disk full")
        );
    }

    #[test]
    fn falls_back_to_unknown_error() {
        let attempts = vec![attempt_with(Some(vec![failure(None)]))];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()).as_deref(),
            Some("Additional failure info: Unknown error")
        );
    }

    #[test]
    fn only_last_attempt_is_considered() {
        let attempts = vec![
            attempt_with(Some(vec![failure(Some("earlier failure"))])),
            attempt_with(None),
        ];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()),
            None
        );

        let attempts = vec![
            attempt_with(Some(vec![failure(Some("earlier failure"))])),
            attempt_with(Some(vec![failure(Some("latest failure"))])),
        ];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()).as_deref(),
            Some("Additional failure info: latest failure")
        );
    }

    #[test]
    fn only_first_failure_is_considered() {
        let attempts = vec![attempt_with(Some(vec![
            failure(Some("first")),
            failure(Some("second")),
        ]))];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()).as_deref(),
            Some("Additional failure info: first")
        );
    }

    #[test]
    fn uses_injected_catalog() {
        let catalog: Catalog = [
            ("sources.additionalFailureInfo", "Info"),
            ("errorView.unknown", "???"),
        ]
        .into_iter()
        .collect();
        let attempts = vec![attempt_with(Some(vec![failure(None)]))];
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &catalog).as_deref(),
            Some("Info: ???")
        );
    }

    #[test]
    fn reads_bare_attempt_array() {
        let attempts =
            attempts_from_json(r#"[{"id": 0}, {"id": 1, "failureSummary": {"failures": []}}]"#)
                .unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1].id, 1);
    }

    #[test]
    fn reads_job_with_attempts() {
        let json = r#"{"job": {"id": 5}, "attempts": [
            {"id": 0, "failureSummary": {"failures": [{"internalMessage": "disk full"}]}}
        ]}"#;
        let attempts = attempts_from_json(json).unwrap();
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()).as_deref(),
            Some("Additional failure info: disk full")
        );
    }

    #[test]
    fn reads_job_info_with_logs() {
        let json = r#"{"job": {"id": 5}, "attempts": [
            {"attempt": {"id": 0, "failureSummary": {"failures": [{}]}}, "logs": {"logLines": []}}
        ]}"#;
        let attempts = attempts_from_json(json).unwrap();
        assert_eq!(
            resolve_failure_message(Some(attempts.as_slice()), &Catalog::english()).as_deref(),
            Some("Additional failure info: Unknown error")
        );
    }

    #[test]
    fn rejects_other_documents() {
        assert!(matches!(
            attempts_from_json(r#"{"job": {"id": 5}}"#),
            Err(SyncLensError::InvalidInput(_))
        ));
        assert!(matches!(
            attempts_from_json("42"),
            Err(SyncLensError::InvalidInput(_))
        ));
        assert!(matches!(
            attempts_from_json("not json"),
            Err(SyncLensError::Json(_))
        ));
    }

    #[test]
    fn is_idempotent() {
        let attempts = vec![attempt_with(Some(vec![failure(Some("disk full"))]))];
        let catalog = Catalog::english();
        let first = resolve_failure_message(Some(attempts.as_slice()), &catalog);
        let second = resolve_failure_message(Some(attempts.as_slice()), &catalog);
        assert_eq!(first, second);
    }
}
