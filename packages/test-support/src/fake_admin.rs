//! In-memory stand-in for the database server's administrative channel.
//!
//! Clones share state, so a test can hand one clone to the provisioner and
//! inspect accounts and recorded calls through another.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use db_infra::{AccountRole, AdminChannel, AdminError};
use parking_lot::Mutex;

/// One administrative call as the server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCall {
    Ping,
    AccountExists {
        database: String,
        username: String,
    },
    CreateAccount {
        database: String,
        username: String,
        role: AccountRole,
    },
    DropAccount {
        database: String,
        username: String,
    },
}

impl AdminCall {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            AdminCall::CreateAccount { .. } | AdminCall::DropAccount { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub password: String,
    pub role: AccountRole,
}

#[derive(Default)]
struct State {
    accounts: BTreeMap<(String, String), StoredAccount>,
    calls: Vec<AdminCall>,
    unreachable: bool,
    wrong_credentials: bool,
    fail_create: HashSet<String>,
    fail_drop: HashSet<String>,
    vanish_before_drop: HashSet<String>,
    appear_before_create: HashSet<String>,
}

impl State {
    fn gate(&self) -> Result<(), AdminError> {
        if self.unreachable {
            return Err(AdminError::Unreachable(
                "connection refused (in-memory)".to_string(),
            ));
        }
        if self.wrong_credentials {
            return Err(AdminError::Unauthorized(
                "bad root credentials (in-memory)".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAdmin {
    state: Arc<Mutex<State>>,
}

impl InMemoryAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the server were down.
    pub fn unreachable(self) -> Self {
        self.state.lock().unreachable = true;
        self
    }

    /// Every call fails authentication.
    pub fn with_wrong_credentials(self) -> Self {
        self.state.lock().wrong_credentials = true;
        self
    }

    /// `createUser` for `username` fails with a command error.
    pub fn fail_create_for(self, username: &str) -> Self {
        self.state.lock().fail_create.insert(username.to_string());
        self
    }

    /// `dropUser` for `username` fails with a command error.
    pub fn fail_drop_for(self, username: &str) -> Self {
        self.state.lock().fail_drop.insert(username.to_string());
        self
    }

    /// `username` is removed out-of-band right before it is dropped.
    pub fn vanish_before_drop(self, username: &str) -> Self {
        self.state
            .lock()
            .vanish_before_drop
            .insert(username.to_string());
        self
    }

    /// A concurrent run creates `username` right before we do.
    pub fn appear_before_create(self, username: &str) -> Self {
        self.state
            .lock()
            .appear_before_create
            .insert(username.to_string());
        self
    }

    /// Put an account on the server without recording a call.
    pub fn seed(&self, database: &str, username: &str, password: &str, role: AccountRole) {
        self.state.lock().accounts.insert(
            (database.to_string(), username.to_string()),
            StoredAccount {
                password: password.to_string(),
                role,
            },
        );
    }

    pub fn account(&self, database: &str, username: &str) -> Option<StoredAccount> {
        self.state
            .lock()
            .accounts
            .get(&(database.to_string(), username.to_string()))
            .cloned()
    }

    /// All `(database, username)` pairs currently present.
    pub fn account_names(&self) -> Vec<(String, String)> {
        self.state.lock().accounts.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<AdminCall> {
        self.state.lock().calls.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

#[async_trait]
impl AdminChannel for InMemoryAdmin {
    async fn ping(&self) -> Result<(), AdminError> {
        let mut state = self.state.lock();
        state.calls.push(AdminCall::Ping);
        state.gate()
    }

    async fn account_exists(&self, database: &str, username: &str) -> Result<bool, AdminError> {
        let mut state = self.state.lock();
        state.calls.push(AdminCall::AccountExists {
            database: database.to_string(),
            username: username.to_string(),
        });
        state.gate()?;
        Ok(state
            .accounts
            .contains_key(&(database.to_string(), username.to_string())))
    }

    async fn create_account(
        &self,
        database: &str,
        username: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<(), AdminError> {
        let mut state = self.state.lock();
        state.calls.push(AdminCall::CreateAccount {
            database: database.to_string(),
            username: username.to_string(),
            role,
        });
        state.gate()?;

        let key = (database.to_string(), username.to_string());
        if state.appear_before_create.remove(username) {
            state.accounts.insert(
                key.clone(),
                StoredAccount {
                    password: "created-by-someone-else".to_string(),
                    role,
                },
            );
        }
        if state.fail_create.contains(username) {
            return Err(AdminError::Command(format!(
                "createUser {username} rejected (in-memory)"
            )));
        }
        if state.accounts.contains_key(&key) {
            return Err(AdminError::AlreadyExists(username.to_string()));
        }

        state.accounts.insert(
            key,
            StoredAccount {
                password: password.to_string(),
                role,
            },
        );
        Ok(())
    }

    async fn drop_account(&self, database: &str, username: &str) -> Result<(), AdminError> {
        let mut state = self.state.lock();
        state.calls.push(AdminCall::DropAccount {
            database: database.to_string(),
            username: username.to_string(),
        });
        state.gate()?;

        let key = (database.to_string(), username.to_string());
        if state.vanish_before_drop.remove(username) {
            state.accounts.remove(&key);
        }
        if state.fail_drop.contains(username) {
            return Err(AdminError::Command(format!(
                "dropUser {username} rejected (in-memory)"
            )));
        }
        match state.accounts.remove(&key) {
            Some(_) => Ok(()),
            None => Err(AdminError::NotFound(username.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_exists_then_drop() {
        let admin = InMemoryAdmin::new();
        admin
            .create_account("p_db", "p_reader", "pw", AccountRole::Read)
            .await
            .unwrap();
        assert!(admin.account_exists("p_db", "p_reader").await.unwrap());
        assert!(!admin.account_exists("other_db", "p_reader").await.unwrap());

        admin.drop_account("p_db", "p_reader").await.unwrap();
        assert_eq!(
            admin.drop_account("p_db", "p_reader").await,
            Err(AdminError::NotFound("p_reader".to_string()))
        );
        assert_eq!(admin.mutation_count(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_already_exists() {
        let admin = InMemoryAdmin::new();
        admin.seed("p_db", "p_writer", "old", AccountRole::ReadWrite);
        let err = admin
            .create_account("p_db", "p_writer", "new", AccountRole::ReadWrite)
            .await
            .unwrap_err();
        assert_eq!(err, AdminError::AlreadyExists("p_writer".to_string()));
        assert_eq!(admin.account("p_db", "p_writer").unwrap().password, "old");
    }

    #[tokio::test]
    async fn test_unreachable_fails_every_call() {
        let admin = InMemoryAdmin::new().unreachable();
        assert!(matches!(admin.ping().await, Err(AdminError::Unreachable(_))));
        assert!(matches!(
            admin.account_exists("d", "u").await,
            Err(AdminError::Unreachable(_))
        ));
    }
}
