use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::ProvisionError;

pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_HOST: &str = "localhost";

/// Administrative credentials and server location.
///
/// Loaded once from a dotenv-style file and passed explicitly to whoever
/// needs it. The process environment is never read or modified.
#[derive(Clone, PartialEq, Eq)]
pub struct RootConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl RootConfig {
    /// Read `ROOT_NAME`, `ROOT_PASSWORD`, and optionally `HOST`/`PORT` from `path`.
    pub fn from_file(path: &Path) -> Result<Self, ProvisionError> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            ProvisionError::config(format!(
                "cannot read root configuration {}: {e}",
                path.display()
            ))
        })?;

        let mut vars = Vec::new();
        for item in iter {
            let pair = item.map_err(|e| {
                ProvisionError::config(format!(
                    "malformed root configuration {}: {e}",
                    path.display()
                ))
            })?;
            vars.push(pair);
        }

        debug!(path = %path.display(), keys = vars.len(), "root configuration read");
        Self::from_vars(vars)
    }

    /// Build from already-parsed key/value pairs. Later keys win.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ProvisionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut username = None;
        let mut password = None;
        let mut host = None;
        let mut port = None;

        for (key, value) in vars {
            let value = value.into();
            match key.as_ref() {
                "ROOT_NAME" => username = Some(value),
                "ROOT_PASSWORD" => password = Some(value),
                "HOST" => host = Some(value),
                "PORT" => port = Some(value),
                _ => {}
            }
        }

        let username = must_value("ROOT_NAME", username)?;
        let password = must_value("ROOT_PASSWORD", password)?;
        let host = host
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match port.filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ProvisionError::config(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            username,
            password,
            host,
            port,
        })
    }
}

impl fmt::Debug for RootConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Get a required value or return a configuration error
fn must_value(name: &str, value: Option<String>) -> Result<String, ProvisionError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProvisionError::config(format!(
            "Required setting '{name}' is not set in root configuration"
        ))),
    }
}
