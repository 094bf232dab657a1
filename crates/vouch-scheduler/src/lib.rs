//! HTTP adapters for the scheduler and cluster-state endpoints.

mod config;
pub use config::{DEFAULT_REQUEST_TIMEOUT, HttpConfig};

mod errors;
pub use errors::ClientError;

mod marathon;
pub use marathon::MarathonClient;

mod mesos;
pub use mesos::MesosStateClient;

mod connector;
pub use connector::HttpConnector;
