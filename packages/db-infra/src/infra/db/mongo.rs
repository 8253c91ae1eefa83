use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::Client;
use tracing::{debug, trace};

use crate::config::RootConfig;
use crate::domain::AccountRole;
use crate::error::{AdminError, ProvisionError};
use crate::infra::db::admin::AdminChannel;

/// Database the root account authenticates against.
const AUTH_SOURCE: &str = "admin";
const APP_NAME: &str = "provision";

// Server error codes
const USER_NOT_FOUND: i32 = 11;
const AUTHENTICATION_FAILED: i32 = 18;
const DUPLICATE_USER: i32 = 51003;

/// [`AdminChannel`] backed by the official MongoDB driver, authenticated as root.
pub struct MongoAdmin {
    client: Client,
}

impl MongoAdmin {
    /// Build a client for the configured server.
    ///
    /// The driver connects lazily, so an unreachable server or bad
    /// credentials only surface on the first command (normally the ping).
    pub fn connect(config: &RootConfig) -> Result<Self, ProvisionError> {
        let credential = Credential::builder()
            .username(config.username.clone())
            .password(config.password.clone())
            .source(AUTH_SOURCE.to_string())
            .build();

        let options = ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: config.host.clone(),
                port: Some(config.port),
            }])
            .credential(credential)
            .app_name(APP_NAME.to_string())
            .build();

        let client = Client::with_options(options).map_err(|e| {
            ProvisionError::connectivity(format!(
                "failed to build client for {}:{}: {e}",
                config.host, config.port
            ))
        })?;

        debug!(host = %config.host, port = config.port, "admin client created");
        Ok(Self { client })
    }

    async fn run(&self, database: &str, command: Document) -> Result<Document, MongoError> {
        trace!(database, command = ?command.keys().next(), "run_command");
        self.client.database(database).run_command(command).await
    }
}

#[async_trait]
impl AdminChannel for MongoAdmin {
    async fn ping(&self) -> Result<(), AdminError> {
        self.run(AUTH_SOURCE, doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| classify(e, "ping"))
    }

    async fn account_exists(&self, database: &str, username: &str) -> Result<bool, AdminError> {
        let reply = self
            .run(
                database,
                doc! { "usersInfo": { "user": username, "db": database } },
            )
            .await
            .map_err(|e| classify(e, username))?;

        let users = reply
            .get_array("users")
            .map_err(|e| AdminError::Command(format!("malformed usersInfo reply: {e}")))?;
        Ok(!users.is_empty())
    }

    async fn create_account(
        &self,
        database: &str,
        username: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<(), AdminError> {
        self.run(
            database,
            doc! {
                "createUser": username,
                "pwd": password,
                "roles": [ { "role": role.as_str(), "db": database } ],
            },
        )
        .await
        .map(|_| ())
        .map_err(|e| classify(e, username))
    }

    async fn drop_account(&self, database: &str, username: &str) -> Result<(), AdminError> {
        self.run(database, doc! { "dropUser": username })
            .await
            .map(|_| ())
            .map_err(|e| classify(e, username))
    }
}

/// Map a driver error onto the channel's error kinds. `subject` names the
/// account (or operation) the command was about.
fn classify(err: MongoError, subject: &str) -> AdminError {
    match err.kind.as_ref() {
        ErrorKind::Authentication { message, .. } => AdminError::Unauthorized(message.clone()),
        ErrorKind::Command(command_error) => match command_error.code {
            AUTHENTICATION_FAILED => AdminError::Unauthorized(command_error.message.clone()),
            USER_NOT_FOUND => AdminError::NotFound(subject.to_string()),
            DUPLICATE_USER => AdminError::AlreadyExists(subject.to_string()),
            code => AdminError::Command(format!(
                "{} ({code}): {}",
                command_error.code_name, command_error.message
            )),
        },
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            AdminError::Unreachable(err.to_string())
        }
        _ => AdminError::Command(err.to_string()),
    }
}
