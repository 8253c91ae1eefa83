use crate::domain::account::{AccountRole, AccountSpec};
use crate::error::ProvisionError;

/// MongoDB rejects database names of 64 bytes or more.
const MAX_DATABASE_NAME_BYTES: usize = 63;

/// Characters MongoDB forbids in database names on any platform.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '.', '"', '$', '*', '<', '>', ':', '|', '?', ' ', '\0'];

/// A validated project name and the identifiers derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
}

impl Project {
    /// Validate `name` and build a project from it.
    ///
    /// Rejects empty names, control characters, characters the server forbids in
    /// database names, and names whose derived database would be too long.
    /// The same rules keep the credential file names inside the output
    /// directory.
    pub fn new(name: &str) -> Result<Self, ProvisionError> {
        if name.trim().is_empty() {
            return Err(ProvisionError::usage("project name must not be empty"));
        }

        if let Some(bad) = name
            .chars()
            .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control())
        {
            return Err(ProvisionError::usage(format!(
                "project name '{}' contains forbidden character {:?}",
                name.escape_debug(),
                bad
            )));
        }

        let project = Self {
            name: name.to_string(),
        };
        if project.database().len() > MAX_DATABASE_NAME_BYTES {
            return Err(ProvisionError::usage(format!(
                "project name '{name}' is too long: database name must be under {} bytes",
                MAX_DATABASE_NAME_BYTES + 1
            )));
        }

        Ok(project)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> String {
        format!("{}_db", self.name)
    }

    pub fn reader_username(&self) -> String {
        format!("{}_reader", self.name)
    }

    pub fn writer_username(&self) -> String {
        format!("{}_writer", self.name)
    }

    pub fn reader(&self) -> AccountSpec {
        AccountSpec {
            username: self.reader_username(),
            database: self.database(),
            role: AccountRole::Read,
        }
    }

    pub fn writer(&self) -> AccountSpec {
        AccountSpec {
            username: self.writer_username(),
            database: self.database(),
            role: AccountRole::ReadWrite,
        }
    }

    /// Reader first, then writer. Provisioning follows this order.
    pub fn accounts(&self) -> [AccountSpec; 2] {
        [self.reader(), self.writer()]
    }
}
