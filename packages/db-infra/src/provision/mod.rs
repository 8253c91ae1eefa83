//! Project provisioning: resolve existing accounts, create fresh ones, export
//! their credentials.

pub mod credentials;
pub mod password;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::RootConfig;
use crate::domain::{AccountSpec, Project};
use crate::error::{AdminError, ProvisionError};
use crate::infra::db::admin::AdminChannel;
use crate::infra::db::uri::redact_uri;

pub use credentials::{AccountCredential, CredentialFiles, CredentialJson, CredentialRecord};
pub use password::generate_password;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub project: Project,
    pub record: CredentialRecord,
    pub files: CredentialFiles,
    /// Accounts dropped before creation (only under `force`).
    pub replaced: Vec<String>,
}

/// Creates a project's reader and writer accounts over an [`AdminChannel`].
///
/// Assumes the channel already passed its liveness probe.
pub struct Provisioner<A> {
    admin: A,
    config: RootConfig,
    output_dir: PathBuf,
}

impl<A: AdminChannel> Provisioner<A> {
    pub fn new(admin: A, config: RootConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            admin,
            config,
            output_dir: output_dir.into(),
        }
    }

    pub async fn provision(
        &self,
        project: &Project,
        force: bool,
    ) -> Result<ProvisionReport, ProvisionError> {
        let database = project.database();
        info!(project = project.name(), database = %database, force, "provision=start");

        let existing = self.existing_accounts(project).await?;
        let replaced = if existing.is_empty() {
            Vec::new()
        } else if !force {
            let usernames: Vec<String> = existing.into_iter().map(|a| a.username).collect();
            warn!(
                project = project.name(),
                existing = ?usernames,
                "accounts already exist; refusing without --force"
            );
            return Err(ProvisionError::Conflict {
                project: project.name().to_string(),
                database,
                existing: usernames,
            });
        } else {
            self.drop_existing(&existing).await?
        };

        let reader = self.create(project, &project.reader(), None).await?;
        let writer = self
            .create(project, &project.writer(), Some(&reader.username))
            .await?;

        let record = CredentialRecord {
            database,
            reader,
            writer,
        };
        let files = record.write_files(&self.output_dir, project.name())?;

        info!(
            project = project.name(),
            reader_uri = %redact_uri(&record.reader.uri),
            writer_uri = %redact_uri(&record.writer.uri),
            "✅ provision=done"
        );

        Ok(ProvisionReport {
            project: project.clone(),
            record,
            files,
            replaced,
        })
    }

    /// The project's accounts currently present on the server, reader first.
    pub async fn existing_accounts(
        &self,
        project: &Project,
    ) -> Result<Vec<AccountSpec>, ProvisionError> {
        let mut existing = Vec::new();
        for account in project.accounts() {
            let present = self
                .admin
                .account_exists(&account.database, &account.username)
                .await
                .map_err(|e| lookup_error(&account, e))?;
            if present {
                info!(username = %account.username, database = %account.database, "account exists");
                existing.push(account);
            }
        }
        Ok(existing)
    }

    /// Drop each listed account. An account that is already gone is skipped.
    async fn drop_existing(&self, accounts: &[AccountSpec]) -> Result<Vec<String>, ProvisionError> {
        let mut dropped = Vec::new();
        for account in accounts {
            match self
                .admin
                .drop_account(&account.database, &account.username)
                .await
            {
                Ok(()) => {
                    warn!(username = %account.username, database = %account.database, "account dropped");
                    dropped.push(account.username.clone());
                }
                Err(AdminError::NotFound(_)) => {
                    info!(username = %account.username, "account already absent; nothing to drop");
                }
                Err(e) => {
                    return Err(ProvisionError::mutation(format!(
                        "failed to drop account '{}' in '{}': {e}",
                        account.username, account.database
                    )));
                }
            }
        }
        Ok(dropped)
    }

    /// Create one account with a fresh password. `created_before` names an
    /// account this run already created, reported if this one fails.
    async fn create(
        &self,
        project: &Project,
        account: &AccountSpec,
        created_before: Option<&str>,
    ) -> Result<AccountCredential, ProvisionError> {
        let password = generate_password();

        match self
            .admin
            .create_account(&account.database, &account.username, &password, account.role)
            .await
        {
            Ok(()) => {
                info!(
                    username = %account.username,
                    database = %account.database,
                    role = %account.role,
                    "account created"
                );
                Ok(AccountCredential::new(
                    &self.config,
                    &account.database,
                    account.username.clone(),
                    password,
                ))
            }
            // Another run created it between our existence check and now.
            // Anything this run created is on the server too.
            Err(AdminError::AlreadyExists(_)) => {
                let mut existing: Vec<String> =
                    created_before.into_iter().map(str::to_string).collect();
                existing.push(account.username.clone());
                Err(ProvisionError::Conflict {
                    project: project.name().to_string(),
                    database: account.database.clone(),
                    existing,
                })
            }
            Err(e) => {
                let left_behind = created_before
                    .map(|u| format!("; account '{u}' was already created and left in place"))
                    .unwrap_or_default();
                Err(ProvisionError::mutation(format!(
                    "failed to create account '{}' with role {} in '{}': {e}{left_behind}",
                    account.username, account.role, account.database
                )))
            }
        }
    }
}

/// A failed existence check means the server cannot be queried as root.
fn lookup_error(account: &AccountSpec, err: AdminError) -> ProvisionError {
    ProvisionError::connectivity(format!(
        "failed to look up account '{}' in '{}': {err}",
        account.username, account.database
    ))
}
