//! TOML-based configuration.
//!
//! Two documents feed a watch run:
//! - [`Config`]: the booking site, credentials, timing and mail transport
//! - [`WatchInput`]: what to watch and how many spots are needed
//!
//! The site config lives at `~/.config/teewatch/config.toml` unless a path
//! is given explicitly.

mod watch_input;

pub use watch_input::{WatchInput, WatchInputEntry};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding the configured password.
pub const PASSWORD_ENV: &str = "TEEWATCH_PASSWORD";

/// Login credentials for the booking site.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Mailgun transport settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailgunConfig {
    pub api_key: String,
    pub domain: String,
    #[serde(default = "default_mailgun_api_base")]
    pub api_base: String,
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("api_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Notification addressing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub from: String,
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
}

/// Site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Club root, e.g. `https://members.brsgolf.com/royalclub`.
    pub base_url: String,
    /// Tee-sheet (course) identifier in the data URL.
    #[serde(default = "default_resource_id")]
    pub resource_id: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// How long a login stays usable.
    #[serde(default = "default_login_interval_secs")]
    pub login_interval_secs: u64,
    pub credentials: Credentials,
    pub mailgun: MailgunConfig,
    pub notification: NotificationConfig,
}

fn default_resource_id() -> String {
    "1".into()
}
fn default_poll_interval_secs() -> u64 {
    60
}
fn default_login_interval_secs() -> u64 {
    1200
}
fn default_mailgun_api_base() -> String {
    "https://api.mailgun.net".into()
}

/// Returns `~/.config/teewatch/`.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("teewatch")
}

/// Read a TOML document from disk.
pub(crate) fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load and validate. [`PASSWORD_ENV`] wins over the file's password.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut cfg: Config = read_toml(path)?;
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            if !password.is_empty() {
                cfg.credentials.password = password;
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        Url::parse(&self.mailgun.api_base).map_err(|e| invalid("mailgun.api_base", e))?;

        if self.resource_id.trim().is_empty() {
            return Err(ConfigError::MissingKey("resource_id".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs", "must be greater than zero"));
        }
        if self.login_interval_secs == 0 {
            return Err(invalid("login_interval_secs", "must be greater than zero"));
        }
        if self.credentials.username.trim().is_empty() {
            return Err(ConfigError::MissingKey("credentials.username".into()));
        }
        if self.credentials.password.is_empty() {
            return Err(ConfigError::MissingKey("credentials.password".into()));
        }
        if self.mailgun.domain.trim().is_empty() {
            return Err(ConfigError::MissingKey("mailgun.domain".into()));
        }
        if self.notification.to.is_empty() {
            return Err(invalid("notification.to", "at least one recipient is required"));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| invalid("base_url", e))?;
        if url.cannot_be_a_base() {
            return Err(invalid("base_url", "must be an absolute http(s) URL"));
        }
        Ok(url)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn login_validity(&self) -> chrono::Duration {
        chrono::Duration::from_std(Duration::from_secs(self.login_interval_secs))
            .unwrap_or(chrono::Duration::MAX)
    }
}

fn invalid(key: &str, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        base_url = "https://members.example.com/royalclub"

        [credentials]
        username = "alice"
        password = "s3cret"

        [mailgun]
        api_key = "key-123"
        domain = "mg.example.com"

        [notification]
        from = "Tee Watch <teewatch@mg.example.com>"
        to = ["alice@example.com"]
    "#;

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = Config::from_toml_str(MINIMAL).unwrap();
        assert_eq!(cfg.resource_id, "1");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(60));
        assert_eq!(cfg.login_validity(), chrono::Duration::minutes(20));
        assert_eq!(cfg.mailgun.api_base, "https://api.mailgun.net");
        assert!(cfg.notification.cc.is_empty());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let content = format!("poll_interval_secs = 0\n{MINIMAL}");
        let err = Config::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "poll_interval_secs"));
    }

    #[test]
    fn rejects_relative_base_url() {
        let content = MINIMAL.replace("https://members.example.com/royalclub", "royalclub");
        let err = Config::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "base_url"));
    }

    #[test]
    fn rejects_empty_recipients() {
        let content = MINIMAL.replace(r#"to = ["alice@example.com"]"#, "to = []");
        assert!(Config::from_toml_str(&content).is_err());
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let err = Config::from_toml_str(r#"base_url = "https://example.com""#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.credentials.username, "alice");
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = Config::from_toml_str(MINIMAL).unwrap();
        let dump = format!("{cfg:?}");
        assert!(!dump.contains("s3cret"));
        assert!(!dump.contains("key-123"));
    }
}
