use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vouch_core::BackendConfig;
use vouch_model::{ClaimRequest, LeaseId};

use crate::{error::ApiError, handler::AuthHandler};

/// Human-readable description of the login parameters.
pub const HELP: &str = "\
The task-identity auth method lets a task running under a container scheduler \
log in by proving which task it is.

Send the following fields, all taken from the task's environment:

  marathon_app_id       application id (MARATHON_APP_ID)
  marathon_app_version  application version (MARATHON_APP_VERSION)
  mesos_task_id         task id (MESOS_TASK_ID)

A login succeeds only for a task of that application and version that started \
within the configured startup window. Issued leases are renewable.";

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: AuthHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build the workload-facing router.
    ///
    /// Routes:
    /// - POST /v1/auth/login - Verify a claim and issue a lease
    /// - POST /v1/auth/renew - Renew a stored lease
    /// - GET  /v1/help       - Login help text
    pub fn router(&self) -> Router {
        Router::new()
            .route("/v1/auth/login", post(login::<H>))
            .route("/v1/auth/renew", post(renew::<H>))
            .route("/v1/help", get(help))
            .with_state(self.handler.clone())
    }

    /// Build the operator router. Serve it on its own listener, never next to
    /// [`router`](Self::router).
    ///
    /// Routes:
    /// - GET /v1/config - Read backend config
    /// - PUT /v1/config - Replace backend config
    pub fn admin_router(&self) -> Router {
        Router::new()
            .route("/v1/config", get(read_config::<H>).put(write_config::<H>))
            .with_state(self.handler.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RenewRequest {
    lease_id: String,
}

#[derive(Debug, Serialize)]
struct HelpResponse {
    help: &'static str,
}

/// POST /v1/auth/login
async fn login<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<ClaimRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: AuthHandler,
{
    let Json(req) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    debug!(app_id = req.marathon_app_id.as_deref().unwrap_or(""), "login attempt");

    let lease = handler.login(req).await?;
    debug!(lease_id = %lease.lease_id, "lease issued");
    Ok(Json(lease))
}

/// POST /v1/auth/renew
///
/// 200 with the extended lease, 204 when renewal was declined.
async fn renew<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<RenewRequest>, JsonRejection>,
) -> Result<Response, ApiError>
where
    H: AuthHandler,
{
    let Json(req) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    if req.lease_id.trim().is_empty() {
        return Err(ApiError::InvalidRequest("lease_id cannot be empty".into()));
    }

    let lease_id = LeaseId::from(req.lease_id);
    match handler.renew(&lease_id).await? {
        Some(lease) => Ok(Json(lease).into_response()),
        None => {
            debug!(%lease_id, "renewal declined");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// GET /v1/config
async fn read_config<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: AuthHandler,
{
    Ok(Json(handler.read_config().await?))
}

/// PUT /v1/config
async fn write_config<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<BackendConfig>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: AuthHandler,
{
    let Json(config) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    handler.write_config(config).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/help
async fn help() -> impl IntoResponse {
    Json(HelpResponse { help: HELP })
}
