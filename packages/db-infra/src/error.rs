use std::path::PathBuf;

use thiserror::Error;

/// Exit code for bad or missing command-line arguments.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Terminal failures of a provisioning run. None are retried.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Usage error: {message}")]
    Usage { message: String },
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Connectivity error: {message}")]
    Connectivity { message: String },
    #[error("Conflict: accounts already exist for project '{project}': {}", .existing.join(", "))]
    Conflict {
        project: String,
        database: String,
        existing: Vec<String>,
    },
    #[error("Mutation error: {message}")]
    Mutation { message: String },
    #[error("Output error: failed to write {}: {message}", .path.display())]
    Output { path: PathBuf, message: String },
}

impl ProvisionError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    pub fn mutation(message: impl Into<String>) -> Self {
        Self::Mutation {
            message: message.into(),
        }
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProvisionError::Usage { .. } => USAGE_EXIT_CODE,
            ProvisionError::Config { .. } => 3,
            ProvisionError::Connectivity { .. } => 4,
            ProvisionError::Conflict { .. } => 5,
            ProvisionError::Mutation { .. } => 6,
            ProvisionError::Output { .. } => 7,
        }
    }

    /// Recovery options shown to the operator. Only conflicts carry any.
    pub fn guidance(&self) -> Vec<String> {
        let ProvisionError::Conflict {
            project,
            database,
            existing,
        } = self
        else {
            return Vec::new();
        };

        let mut lines = vec![
            format!("re-run with --force to drop and recreate the accounts for '{project}'"),
            "choose a different project name".to_string(),
            format!("inspect the existing credentials in {project}.env or {project}.json"),
        ];
        for username in existing {
            lines.push(format!(
                "drop manually: use {database}; db.dropUser(\"{username}\")"
            ));
        }
        lines
    }
}

/// Failures reported by the administrative command channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("authentication failed: {0}")]
    Unauthorized(String),
    #[error("account '{0}' already exists")]
    AlreadyExists(String),
    #[error("account '{0}' not found")]
    NotFound(String),
    #[error("command failed: {0}")]
    Command(String),
}
