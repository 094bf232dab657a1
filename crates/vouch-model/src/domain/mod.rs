mod claim;
pub use claim::{ClaimError, ClaimRequest, VerificationClaim};

mod task_record;
pub use task_record::TaskRecord;

mod application;
pub use application::Application;

mod cluster;
pub use cluster::{ClusterSnapshot, ClusterTask, Framework, TASK_RUNNING};

mod lease;
pub use lease::{Lease, LeaseId, LeaseState};

mod policy;
pub use policy::policy_name;

mod app_id;
pub use app_id::{canonical_app_id, is_valid_app_id};

/// Scheduler-scoped application identifier (e.g. `/payments/api`).
pub type AppId = String;

/// Opaque version token assigned by the scheduler at each application revision.
pub type AppVersion = String;
