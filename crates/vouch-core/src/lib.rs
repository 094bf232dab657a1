pub mod clock;
pub use clock::{Clock, FixedClock, SystemClock};

pub mod error;
pub use error::{LifecycleError, VerificationError};

pub mod freshness;
pub use freshness::{DEFAULT_STARTUP_THRESHOLD, FreshnessPolicy, is_fresh};

pub mod scheduler;
pub use scheduler::{FailoverScheduler, SchedulerClient, SchedulerError};

pub mod cluster;
pub use cluster::{ClusterStateError, ClusterStateSource, find_running, is_running};

pub mod config;
pub use config::{BackendConfig, ConfigError, ConfigStore, MemoryConfigStore, VerifierSettings};

mod endpoints;
pub use endpoints::{Connector, Endpoints};

pub mod verify;
pub use verify::{VerifiedTask, Verifier};

pub mod lease;
pub use lease::CredentialLifecycle;

#[cfg(test)]
mod testing;
