use std::fmt;

/// Built-in database role granted to a provisioned account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountRole {
    Read,
    ReadWrite,
}

impl AccountRole {
    /// Role name as the server expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Read => "read",
            AccountRole::ReadWrite => "readWrite",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account to provision: username and role, scoped to one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSpec {
    pub username: String,
    pub database: String,
    pub role: AccountRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_match_server_builtins() {
        assert_eq!(AccountRole::Read.as_str(), "read");
        assert_eq!(AccountRole::ReadWrite.to_string(), "readWrite");
    }
}
