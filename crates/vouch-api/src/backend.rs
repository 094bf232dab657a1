use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use vouch_core::{
    BackendConfig, Clock, ConfigStore, Connector, CredentialLifecycle, Endpoints, LifecycleError,
    VerifierSettings,
};
use vouch_model::{ClaimRequest, Lease, LeaseId};

use crate::error::ApiError;
use crate::handler::AuthHandler;
use crate::leases::{LeaseTable, Replace};

/// Ready-to-use [`AuthHandler`].
///
/// Configuration is read from the store once per request and turned into
/// upstream clients by the connector, so the latest stored config always wins.
pub struct AuthBackend {
    store: Arc<dyn ConfigStore>,
    connector: Arc<dyn Connector>,
    lifecycle: CredentialLifecycle,
    leases: LeaseTable,
}

impl AuthBackend {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        connector: Arc<dyn Connector>,
        settings: VerifierSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            connector,
            lifecycle: CredentialLifecycle::new(settings, clock),
            leases: LeaseTable::new(),
        }
    }

    pub fn leases(&self) -> &LeaseTable {
        &self.leases
    }

    fn endpoints(&self) -> Result<Endpoints, ApiError> {
        let config = BackendConfig::load(self.store.as_ref())?;
        Ok(self.connector.connect(&config)?)
    }

    fn now(&self) -> time::OffsetDateTime {
        self.lifecycle.verifier().clock().now()
    }
}

#[async_trait]
impl AuthHandler for AuthBackend {
    async fn login(&self, request: ClaimRequest) -> Result<Lease, ApiError> {
        let claim = request.into_claim().map_err(|e| {
            debug!(error = %e, "rejecting malformed claim");
            ApiError::from(e)
        })?;

        for expired in self.leases.prune_expired(self.now()) {
            debug!(
                lease_id = %expired.lease_id,
                app_id = %expired.metadata.app_id,
                state = ?expired.state,
                "dropped expired lease"
            );
        }

        let endpoints = self.endpoints()?;
        let lease = self
            .lifecycle
            .issue(&endpoints, &claim)
            .await
            .inspect_err(|e| log_denial("login", &claim.app_id, e))?;

        self.leases.put(lease.clone());
        debug!(outstanding = self.leases.len(), "lease stored");
        Ok(lease)
    }

    async fn renew(&self, lease_id: &LeaseId) -> Result<Option<Lease>, ApiError> {
        let lease = self
            .leases
            .get(lease_id)
            .ok_or_else(|| ApiError::LeaseNotFound(lease_id.to_string()))?;

        let endpoints = self.endpoints()?;
        match self.lifecycle.renew(&endpoints, &lease).await {
            Ok(Some(renewed)) => match self.leases.replace(renewed.clone(), lease.renewals) {
                Replace::Replaced => Ok(Some(renewed)),
                Replace::Missing => Err(ApiError::LeaseNotFound(lease_id.to_string())),
                Replace::Stale => Err(ApiError::Conflict(lease_id.to_string())),
            },
            Ok(None) => Ok(None),
            Err(e @ LifecycleError::Expired(_)) => {
                if let Some(expired) = self.leases.expire(lease_id, self.now()) {
                    debug!(lease_id = %expired.lease_id, state = ?expired.state, "lease expired");
                }
                log_denial("renew", &lease.metadata.app_id, &e);
                Err(e.into())
            }
            Err(e) => {
                log_denial("renew", &lease.metadata.app_id, &e);
                Err(e.into())
            }
        }
    }

    async fn read_config(&self) -> Result<BackendConfig, ApiError> {
        Ok(BackendConfig::load(self.store.as_ref())?)
    }

    async fn write_config(&self, config: BackendConfig) -> Result<(), ApiError> {
        self.connector.connect(&config)?;
        config.save(self.store.as_ref())?;
        info!(
            scheduler_url = %config.scheduler_url,
            cluster_state_url = config.cluster_state_url.as_deref().unwrap_or(""),
            "backend config updated"
        );
        Ok(())
    }
}

/// Operator-fixable failures are logged louder than plain identity denials.
fn log_denial(op: &'static str, app_id: &str, err: &LifecycleError) {
    match err {
        LifecycleError::Verification(e) if e.is_operator_fixable() => {
            warn!(op, app_id, kind = e.kind(), error = %e, "verification could not complete");
        }
        _ => info!(op, app_id, kind = err.kind(), error = %err, "authentication denied"),
    }
}
