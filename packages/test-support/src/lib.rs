//! Test support for the provisioning crates.
//!
//! - [`InMemoryAdmin`]: a recording, failure-injectable administrative channel
//! - [`logging::init`]: quiet, idempotent tracing setup for test binaries
//! - [`unique_project`]: ULID-based project names that never collide

pub mod fake_admin;
pub mod logging;

use ulid::Ulid;

pub use fake_admin::{AdminCall, InMemoryAdmin, StoredAccount};

/// Generate a unique, valid project name with the given prefix
///
/// The result is lowercase and short enough for the derived database name.
///
/// # Examples
/// ```
/// use test_support::unique_project;
///
/// let p1 = unique_project("svc");
/// let p2 = unique_project("svc");
/// assert_ne!(p1, p2);
/// assert!(db_infra::Project::new(&p1).is_ok());
/// ```
pub fn unique_project(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new()).to_lowercase()
}
