mod error;
pub use error::ApiError;

mod handler;
pub use handler::AuthHandler;

mod leases;
pub use leases::{LeaseTable, Replace};

mod backend;
pub use backend::AuthBackend;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HELP, HttpApi};

#[cfg(feature = "http")]
pub use axum;

#[cfg(feature = "client")]
mod client;

#[cfg(feature = "client")]
pub use client::{ClientError, VouchClient};
