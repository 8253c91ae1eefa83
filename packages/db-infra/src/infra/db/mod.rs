pub mod admin;
pub mod core;
pub mod mongo;
pub mod uri;

pub use admin::AdminChannel;
pub use core::{orchestrate_provisioning, orchestrate_provisioning_with, ProvisionRequest};
pub use mongo::MongoAdmin;
pub use uri::{connection_uri, redact_uri};
