use async_trait::async_trait;

use crate::domain::AccountRole;
use crate::error::AdminError;

/// Administrative command channel to the database server.
///
/// Every call is one blocking round trip. Implementations authenticate as
/// the root account; the provisioner never sees a raw connection.
#[async_trait]
pub trait AdminChannel: Send + Sync {
    /// Authenticated liveness probe.
    async fn ping(&self) -> Result<(), AdminError>;

    /// Whether `username` exists in `database`.
    async fn account_exists(&self, database: &str, username: &str) -> Result<bool, AdminError>;

    /// Create `username` in `database` holding exactly `role` on that database.
    ///
    /// Returns [`AdminError::AlreadyExists`] when the server's uniqueness
    /// constraint rejects the account.
    async fn create_account(
        &self,
        database: &str,
        username: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<(), AdminError>;

    /// Drop `username` from `database`.
    ///
    /// Returns [`AdminError::NotFound`] when there is nothing to drop.
    async fn drop_account(&self, database: &str, username: &str) -> Result<(), AdminError>;
}
