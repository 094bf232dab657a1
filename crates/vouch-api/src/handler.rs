use async_trait::async_trait;
use vouch_core::BackendConfig;
use vouch_model::{ClaimRequest, Lease, LeaseId};

use crate::error::ApiError;

/// Authentication API handler.
///
/// Abstracts the backend so the HTTP layer can be mounted over the provided
/// [`AuthBackend`](crate::AuthBackend) or over a custom implementation.
#[async_trait]
pub trait AuthHandler: Send + Sync + 'static {
    /// Verify a task's claim and issue a lease.
    async fn login(&self, request: ClaimRequest) -> Result<Lease, ApiError>;

    /// Re-verify the task behind a stored lease and extend it.
    ///
    /// `Ok(None)` means renewal was declined without an error.
    async fn renew(&self, lease_id: &LeaseId) -> Result<Option<Lease>, ApiError>;

    async fn read_config(&self) -> Result<BackendConfig, ApiError>;

    async fn write_config(&self, config: BackendConfig) -> Result<(), ApiError>;
}
