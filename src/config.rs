use std::{env, fmt, path::PathBuf, str::FromStr};

use cookie::Key;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://attendance.db?mode=rwc";
pub const DEFAULT_TICKET_LOG_PATH: &str = "scanned_tickets.json";

/// `cookie::Key::derive_from` refuses shorter master keys.
const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    /// Submitted values are trimmed before comparing.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        username.trim() == self.username && password.trim() == self.password
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub ticket_log_path: PathBuf,
    pub assets_dir: PathBuf,
    pub admin: AdminCredentials,
    session_secret: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let session_secret = var("SESSION_SECRET");
        if let Some(secret) = &session_secret {
            if secret.len() < MIN_SESSION_SECRET_LEN {
                return Err(ConfigError::Invalid {
                    key: "SESSION_SECRET",
                    message: format!("must be at least {} bytes", MIN_SESSION_SECRET_LEN),
                });
            }
        }

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", var("PORT"), 3000)?,
            ticket_log_path: var("TICKET_LOG_PATH")
                .unwrap_or_else(|| DEFAULT_TICKET_LOG_PATH.to_string())
                .into(),
            assets_dir: var("ASSETS_DIR")
                .unwrap_or_else(|| "assets".to_string())
                .into(),
            admin: AdminCredentials {
                username: var("SCANNER_USERNAME").ok_or(ConfigError::Missing("SCANNER_USERNAME"))?,
                password: var("SCANNER_PASSWORD").ok_or(ConfigError::Missing("SCANNER_PASSWORD"))?,
            },
            session_secret,
            log_file: var("LOG_FILE").map(PathBuf::from),
        })
    }

    pub fn has_session_secret(&self) -> bool {
        self.session_secret.is_some()
    }

    /// Signing key for session cookies. Without `SESSION_SECRET` a random key
    /// is generated, so sessions do not survive a restart.
    pub fn session_key(&self) -> Key {
        match &self.session_secret {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => Key::generate(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ticket_log_path", &self.ticket_log_path)
            .field("assets_dir", &self.assets_dir)
            .field("admin", &self.admin)
            .field("has_session_secret", &self.has_session_secret())
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = Config::from_lookup(lookup(&[
            ("SCANNER_USERNAME", "admin@example.com"),
            ("SCANNER_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.ticket_log_path, PathBuf::from(DEFAULT_TICKET_LOG_PATH));
        assert!(config.log_file.is_none());
        assert!(!config.has_session_secret());
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let err = Config::from_lookup(lookup(&[("SCANNER_PASSWORD", "secret")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SCANNER_USERNAME"));

        let err = Config::from_lookup(lookup(&[
            ("SCANNER_USERNAME", "admin"),
            ("SCANNER_PASSWORD", "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SCANNER_PASSWORD"));
    }

    #[test]
    fn invalid_port_and_short_secret_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("SCANNER_USERNAME", "admin"),
            ("SCANNER_PASSWORD", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err = Config::from_lookup(lookup(&[
            ("SCANNER_USERNAME", "admin"),
            ("SCANNER_PASSWORD", "secret"),
            ("SESSION_SECRET", "too-short"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SESSION_SECRET", .. }));
    }

    #[test]
    fn credentials_match_after_trimming() {
        let admin = AdminCredentials {
            username: "admin@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(admin.matches("  admin@example.com ", "secret\n"));
        assert!(!admin.matches("admin@example.com", "Secret"));
        assert!(!format!("{:?}", admin).contains("secret"));
    }
}
