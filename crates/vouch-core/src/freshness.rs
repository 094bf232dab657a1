use std::time::Duration;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use vouch_model::TaskRecord;

use crate::error::VerificationError;

/// How long after task start a credential request is still trusted.
pub const DEFAULT_STARTUP_THRESHOLD: Duration = Duration::from_secs(5);

/// `now - started_at <= threshold`, inclusive at the boundary.
///
/// A start time in the future (clock skew) counts as fresh.
pub fn is_fresh(started_at: OffsetDateTime, now: OffsetDateTime, threshold: Duration) -> bool {
    now - started_at <= threshold
}

/// Gate that only admits tasks which started within the threshold.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    threshold: Duration,
}

impl FreshnessPolicy {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    pub fn check(&self, task: &TaskRecord, now: OffsetDateTime) -> Result<(), VerificationError> {
        let started_at = parse_started_at(task.started_at.as_deref())?;
        if is_fresh(started_at, now, self.threshold) {
            return Ok(());
        }
        let age = (now - started_at).try_into().unwrap_or(Duration::MAX);
        Err(VerificationError::StaleStartup {
            age,
            threshold: self.threshold,
        })
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STARTUP_THRESHOLD)
    }
}

fn parse_started_at(raw: Option<&str>) -> Result<OffsetDateTime, VerificationError> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| VerificationError::StartupTimeUnverifiable("task has no start time".into()))?;
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|e| VerificationError::StartupTimeUnverifiable(format!("{raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-03-01 10:00:00 UTC);

    fn task_started(started_at: Option<&str>) -> TaskRecord {
        TaskRecord {
            task_id: "t1".into(),
            version: "v1".into(),
            started_at: started_at.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn boundary_is_inclusive() {
        let threshold = Duration::from_secs(5);
        assert!(is_fresh(NOW - threshold, NOW, threshold));
        assert!(is_fresh(NOW - Duration::from_secs(2), NOW, threshold));
        assert!(!is_fresh(
            NOW - threshold - Duration::from_millis(1),
            NOW,
            threshold
        ));
    }

    #[test]
    fn future_start_is_fresh() {
        assert!(is_fresh(
            NOW + Duration::from_secs(3),
            NOW,
            DEFAULT_STARTUP_THRESHOLD
        ));
    }

    #[test]
    fn stale_task_reports_age() {
        let policy = FreshnessPolicy::default();
        let err = policy
            .check(&task_started(Some("2026-03-01T09:59:50Z")), NOW)
            .unwrap_err();

        assert_eq!(
            err,
            VerificationError::StaleStartup {
                age: Duration::from_secs(10),
                threshold: DEFAULT_STARTUP_THRESHOLD,
            }
        );
    }

    #[test]
    fn fractional_offsets_parse() {
        let policy = FreshnessPolicy::default();
        assert!(
            policy
                .check(&task_started(Some("2026-03-01T11:59:58.500+02:00")), NOW)
                .is_ok()
        );
    }

    #[test]
    fn missing_or_garbled_start_time_fails_closed() {
        let policy = FreshnessPolicy::default();

        for raw in [None, Some(""), Some("yesterday"), Some("1462460944")] {
            let err = policy.check(&task_started(raw), NOW).unwrap_err();
            assert!(
                matches!(err, VerificationError::StartupTimeUnverifiable(_)),
                "{raw:?} -> {err:?}"
            );
        }
    }
}
