//! MongoDB project provisioning: one database, a reader and a writer account,
//! and credential files for downstream applications.
//! Used by the provision CLI.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod provision;

pub use config::RootConfig;
pub use domain::{AccountRole, AccountSpec, Project};
pub use error::{AdminError, ProvisionError, USAGE_EXIT_CODE};
pub use infra::db::{
    orchestrate_provisioning, orchestrate_provisioning_with, AdminChannel, MongoAdmin,
    ProvisionRequest,
};
pub use provision::{ProvisionReport, Provisioner};
