use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::VerificationClaim;

/// Unique identifier of an issued lease.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseId(String);

impl LeaseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LeaseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LeaseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a lease in its lifecycle.
///
/// `Unverified` has no lease yet, so it is not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaseState {
    Issued,
    Renewed,
    Expired,
}

/// Time-bounded, policy-scoped grant handed out after a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub lease_id: LeaseId,
    pub policies: BTreeSet<String>,
    pub display_name: String,
    /// The verified claim, kept verbatim so renewal never needs caller input.
    pub metadata: VerificationClaim,
    pub renewable: bool,
    #[serde(with = "ttl_serde")]
    pub ttl: Duration,
    pub state: LeaseState,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    #[serde(default)]
    pub renewals: u32,
}

impl Lease {
    /// Returns `true` once `now` has reached the expiry instant.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.state == LeaseState::Expired || now >= self.expires_at
    }

    /// Move the lease to `Expired` if its TTL has elapsed. Returns the new expiry flag.
    pub fn expire_if_due(&mut self, now: OffsetDateTime) -> bool {
        if self.is_expired(now) {
            self.state = LeaseState::Expired;
            return true;
        }
        false
    }

    /// Time left before expiry, zero when already expired.
    pub fn remaining(&self, now: OffsetDateTime) -> Duration {
        (self.expires_at - now).try_into().unwrap_or(Duration::ZERO)
    }
}

mod ttl_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ttl.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn lease() -> Lease {
        let issued_at = datetime!(2026-01-01 12:00:00 UTC);
        Lease {
            lease_id: LeaseId::from("lease-1"),
            policies: BTreeSet::from(["test-app".to_string()]),
            display_name: "/test-app".into(),
            metadata: VerificationClaim::new("/test-app", "v1", "test-app.1"),
            renewable: true,
            ttl: Duration::from_secs(300),
            state: LeaseState::Issued,
            issued_at,
            expires_at: issued_at + Duration::from_secs(300),
            renewals: 0,
        }
    }

    #[test]
    fn expires_at_deadline() {
        let mut lease = lease();
        let deadline = lease.expires_at;

        assert!(!lease.expire_if_due(deadline - Duration::from_secs(1)));
        assert_eq!(lease.state, LeaseState::Issued);

        assert!(lease.expire_if_due(deadline));
        assert_eq!(lease.state, LeaseState::Expired);
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let lease = lease();
        assert_eq!(lease.remaining(lease.issued_at), Duration::from_secs(300));
        assert_eq!(
            lease.remaining(lease.expires_at + Duration::from_secs(10)),
            Duration::ZERO
        );
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(lease()).unwrap();

        assert_eq!(json["leaseId"], "lease-1");
        assert_eq!(json["policies"], serde_json::json!(["test-app"]));
        assert_eq!(json["ttl"], 300);
        assert_eq!(json["state"], "issued");
        assert_eq!(json["issuedAt"], "2026-01-01T12:00:00Z");
        assert_eq!(json["metadata"]["mesos_task_id"], "test-app.1");

        let back: Lease = serde_json::from_value(json).unwrap();
        assert_eq!(back, lease());
    }
}
