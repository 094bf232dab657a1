use thiserror::Error;
use vouch_core::{ConfigError, LifecycleError, VerificationError};
use vouch_model::ClaimError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("authentication denied: {0}")]
    Denied(#[from] LifecycleError),

    #[error("lease not found: {0}")]
    LeaseNotFound(String),

    #[error("lease {0} was changed by a concurrent renewal")]
    Conflict(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        ApiError::Denied(LifecycleError::Verification(err))
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        ApiError::from(VerificationError::from(err))
    }
}

impl ApiError {
    /// Stable error code returned in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Denied(e) => e.kind(),
            ApiError::LeaseNotFound(_) => "lease_not_found",
            ApiError::Conflict(_) => "lease_conflict",
            ApiError::Config(ConfigError::InvalidEndpoint { .. }) => "invalid_endpoint",
            ApiError::Config(_) => "config_error",
        }
    }
}

#[cfg(feature = "http")]
mod response {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde::Serialize;
    use vouch_core::{ConfigError, LifecycleError, VerificationError};

    use super::ApiError;

    #[derive(Serialize)]
    struct ErrorBody<'a> {
        error: &'a str,
        message: String,
    }

    impl ApiError {
        pub fn status(&self) -> StatusCode {
            match self {
                ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                ApiError::Denied(LifecycleError::Verification(
                    VerificationError::MalformedClaim(_),
                )) => StatusCode::BAD_REQUEST,
                ApiError::Denied(_) => StatusCode::FORBIDDEN,
                ApiError::LeaseNotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Conflict(_) => StatusCode::CONFLICT,
                ApiError::Config(ConfigError::InvalidEndpoint { .. }) => StatusCode::BAD_REQUEST,
                ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let body = ErrorBody {
                error: self.kind(),
                message: self.to_string(),
            };
            (self.status(), Json(body)).into_response()
        }
    }
}
