//! Credential lifecycle: `Unverified -> Issued -> Renewed* -> Expired`.
//!
//! Renewal never trusts the caller. It replays the lease's stored claim
//! against the scheduler and refuses when the task is no longer reported.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};
use vouch_model::{Lease, LeaseId, LeaseState, VerificationClaim, policy_name};

use crate::clock::Clock;
use crate::config::VerifierSettings;
use crate::endpoints::Endpoints;
use crate::error::LifecycleError;
use crate::verify::Verifier;

pub struct CredentialLifecycle {
    verifier: Verifier,
}

impl CredentialLifecycle {
    pub fn new(settings: VerifierSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            verifier: Verifier::new(settings, clock),
        }
    }

    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    /// Verify a fresh caller claim and issue a lease for it.
    pub async fn issue(
        &self,
        endpoints: &Endpoints,
        claim: &VerificationClaim,
    ) -> Result<Lease, LifecycleError> {
        let verified = self.verifier.verify(endpoints, claim).await?;

        let now = self.verifier.clock().now();
        let ttl = self.verifier.settings().lease_ttl;
        let lease = Lease {
            lease_id: LeaseId::from(uuid::Uuid::new_v4().to_string()),
            policies: BTreeSet::from([policy_name(&verified.claim.app_id)]),
            display_name: verified.claim.app_id.clone(),
            metadata: verified.claim,
            renewable: true,
            ttl,
            state: LeaseState::Issued,
            issued_at: now,
            expires_at: now + ttl,
            renewals: 0,
        };

        info!(
            lease_id = %lease.lease_id,
            app_id = %lease.metadata.app_id,
            task_id = %lease.metadata.task_id,
            ttl_secs = ttl.as_secs(),
            "lease issued"
        );
        Ok(lease)
    }

    /// Extend `lease` if its task is still reported by the scheduler.
    ///
    /// Returns `Ok(None)` when the scheduler answers without a task list;
    /// the lease is then left to run out rather than refused with an error.
    pub async fn renew(
        &self,
        endpoints: &Endpoints,
        lease: &Lease,
    ) -> Result<Option<Lease>, LifecycleError> {
        let now = self.verifier.clock().now();

        if !lease.renewable {
            return Err(LifecycleError::NotRenewable(lease.lease_id.clone()));
        }
        if lease.is_expired(now) {
            return Err(LifecycleError::Expired(lease.lease_id.clone()));
        }

        debug!(
            lease_id = %lease.lease_id,
            remaining_secs = lease.remaining(now).as_secs(),
            "renewing lease"
        );
        let Some(task) = self.verifier.locate(endpoints, &lease.metadata).await? else {
            debug!(lease_id = %lease.lease_id, "renewal declined, no task list");
            return Ok(None);
        };

        let ttl = self.verifier.settings().lease_ttl;
        let renewed = Lease {
            policies: BTreeSet::from([policy_name(&lease.metadata.app_id)]),
            display_name: lease.metadata.app_id.clone(),
            ttl,
            state: LeaseState::Renewed,
            expires_at: now + ttl,
            renewals: lease.renewals.saturating_add(1),
            ..lease.clone()
        };

        info!(
            lease_id = %renewed.lease_id,
            app_id = %renewed.metadata.app_id,
            task_id = %task.task_id,
            renewals = renewed.renewals,
            "lease renewed"
        );
        Ok(Some(renewed))
    }
}
