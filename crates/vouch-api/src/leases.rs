use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use time::OffsetDateTime;
use vouch_model::{Lease, LeaseId};

/// Result of a conditional lease update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replace {
    Replaced,
    /// The lease is no longer in the table.
    Missing,
    /// Another renewal got there first.
    Stale,
}

/// In-memory table of outstanding leases, keyed by lease id.
///
/// Renewal looks leases up here instead of trusting a lease sent by the caller.
#[derive(Clone, Default)]
pub struct LeaseTable {
    inner: Arc<RwLock<HashMap<LeaseId, Lease>>>,
}

impl LeaseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a lease.
    pub fn put(&self, lease: Lease) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.insert(lease.lease_id.clone(), lease);
    }

    pub fn get(&self, id: &LeaseId) -> Option<Lease> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.get(id).cloned()
    }

    /// Store `renewed` only if the table still holds the lease at `seen_renewals`.
    ///
    /// Guards the read-verify-write window of a renewal against a concurrent
    /// renewal or expiry of the same lease.
    pub fn replace(&self, renewed: Lease, seen_renewals: u32) -> Replace {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match inner.get_mut(&renewed.lease_id) {
            None => Replace::Missing,
            Some(current) if current.renewals != seen_renewals => Replace::Stale,
            Some(current) => {
                *current = renewed;
                Replace::Replaced
            }
        }
    }

    /// Take a lease out of the table if its TTL has elapsed, marked `Expired`.
    pub fn expire(&self, id: &LeaseId, now: OffsetDateTime) -> Option<Lease> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.get(id).is_some_and(|lease| lease.is_expired(now)) {
            return None;
        }
        let mut lease = inner.remove(id)?;
        lease.expire_if_due(now);
        Some(lease)
    }

    /// Take out every lease whose TTL has elapsed, each marked `Expired`.
    pub fn prune_expired(&self, now: OffsetDateTime) -> Vec<Lease> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let due: Vec<LeaseId> = inner
            .values()
            .filter(|lease| lease.is_expired(now))
            .map(|lease| lease.lease_id.clone())
            .collect();

        due.iter()
            .filter_map(|id| inner.remove(id))
            .map(|mut lease| {
                lease.expire_if_due(now);
                lease
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use super::*;
    use time::macros::datetime;
    use vouch_model::{LeaseState, VerificationClaim};

    const T0: OffsetDateTime = datetime!(2026-03-01 10:00:00 UTC);

    fn lease(id: &str, ttl_secs: u64) -> Lease {
        Lease {
            lease_id: LeaseId::from(id),
            policies: BTreeSet::from(["web".to_string()]),
            display_name: "/web".into(),
            metadata: VerificationClaim::new("/web", "v1", "web.1"),
            renewable: true,
            ttl: Duration::from_secs(ttl_secs),
            state: LeaseState::Issued,
            issued_at: T0,
            expires_at: T0 + Duration::from_secs(ttl_secs),
            renewals: 0,
        }
    }

    fn renewed(base: &Lease) -> Lease {
        Lease {
            state: LeaseState::Renewed,
            renewals: base.renewals + 1,
            ..base.clone()
        }
    }

    #[test]
    fn put_then_get() {
        let table = LeaseTable::new();
        table.put(lease("a", 60));

        assert_eq!(table.get(&LeaseId::from("a")).unwrap().ttl, Duration::from_secs(60));
        assert!(table.get(&LeaseId::from("b")).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn replace_requires_unchanged_renewal_count() {
        let table = LeaseTable::new();
        let original = lease("a", 60);
        table.put(original.clone());

        let first = renewed(&original);
        let second = renewed(&original);

        assert_eq!(table.replace(first, 0), Replace::Replaced);
        assert_eq!(table.replace(second, 0), Replace::Stale);
        assert_eq!(table.get(&LeaseId::from("a")).unwrap().renewals, 1);
    }

    #[test]
    fn replace_does_not_resurrect_dropped_lease() {
        let table = LeaseTable::new();
        let original = lease("a", 10);
        table.put(original.clone());

        assert!(table.expire(&original.lease_id, T0 + Duration::from_secs(10)).is_some());
        assert_eq!(table.replace(renewed(&original), 0), Replace::Missing);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn expire_only_takes_due_leases() {
        let table = LeaseTable::new();
        table.put(lease("a", 60));
        let id = LeaseId::from("a");

        assert!(table.expire(&id, T0 + Duration::from_secs(59)).is_none());
        assert_eq!(table.len(), 1);

        let expired = table.expire(&id, T0 + Duration::from_secs(60)).unwrap();
        assert_eq!(expired.state, LeaseState::Expired);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn prune_drops_only_expired() {
        let table = LeaseTable::new();
        table.put(lease("short", 10));
        table.put(lease("long", 600));

        let pruned = table.prune_expired(T0 + Duration::from_secs(10));

        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].lease_id, LeaseId::from("short"));
        assert_eq!(pruned[0].state, LeaseState::Expired);
        assert!(table.get(&LeaseId::from("short")).is_none());
        assert!(table.get(&LeaseId::from("long")).is_some());
    }
}
