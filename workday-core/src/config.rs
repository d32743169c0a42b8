//! Service configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the config file
//! (`~/.config/workday/config.toml` unless a path is given), then
//! `WORKDAY_*` environment variables. Nested keys use a double
//! underscore, e.g. `WORKDAY_NOTIFY__COMMAND`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{WorkdayError, WorkdayResult};
use crate::gate::{DEFAULT_ORGANIZER_CODE, DEFAULT_VOLUNTEER_CODE, GateCodes};

static DEFAULT_DATA_DIR: &str = "~/.workday";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_volunteer_code() -> String {
    DEFAULT_VOLUNTEER_CODE.to_string()
}

fn default_organizer_code() -> String {
    DEFAULT_ORGANIZER_CODE.to_string()
}

fn default_notify_timeout() -> u64 {
    DEFAULT_NOTIFY_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkdayConfig {
    /// Directory holding events.json and volunteers.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_volunteer_code")]
    pub volunteer_code: String,

    #[serde(default = "default_organizer_code")]
    pub organizer_code: String,

    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// sendmail-compatible command; notifications are disabled when unset
    pub command: Option<String>,

    /// Sender address written into the From header
    pub from: Option<String>,

    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        NotifyConfig {
            command: None,
            from: None,
            timeout_secs: DEFAULT_NOTIFY_TIMEOUT_SECS,
        }
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        WorkdayConfig {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            volunteer_code: default_volunteer_code(),
            organizer_code: default_organizer_code(),
            notify: NotifyConfig::default(),
        }
    }
}

impl WorkdayConfig {
    pub fn config_path() -> WorkdayResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WorkdayError::Config("Could not determine config directory".into()))?
            .join("workday");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration. With no explicit path the default location is
    /// used, and a commented-out template is written there on first run.
    pub fn load(path: Option<&Path>) -> WorkdayResult<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    Self::create_default_config(&path)?;
                }
                path
            }
        };

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("WORKDAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| WorkdayError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WorkdayError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn gate_codes(&self) -> GateCodes {
        GateCodes::new(&self.volunteer_code, &self.organizer_code)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WorkdayResult<()> {
        let contents = format!(
            "\
# workday configuration

# Where events.json and volunteers.json live:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Address the server listens on:
# host = \"{DEFAULT_HOST}\"
# port = {DEFAULT_PORT}

# Gate codes for volunteer signups and organizer edits:
# volunteer_code = \"{DEFAULT_VOLUNTEER_CODE}\"
# organizer_code = \"{DEFAULT_ORGANIZER_CODE}\"

# Signup notifications, piped to a sendmail-compatible program:
# [notify]
# command = \"sendmail -t\"
# from = \"volunteers@club.example\"
# timeout_secs = {DEFAULT_NOTIFY_TIMEOUT_SECS}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WorkdayError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WorkdayError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Role;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = WorkdayConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.data_dir, PathBuf::from("~/.workday"));
        assert!(config.notify.command.is_none());
        assert!(config.gate_codes().verify("1957", Role::Volunteer));
        assert!(config.gate_codes().verify("5791", Role::Organizer));
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        WorkdayConfig::create_default_config(&path).unwrap();

        let config = WorkdayConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.notify.timeout_secs, 10);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/srv/workday"
port = 8080
organizer_code = "2468"

[notify]
command = "msmtp -t"
from = "club@example.com"
"#,
        )
        .unwrap();

        let config = WorkdayConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/srv/workday"));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(config.gate_codes().verify("2468", Role::Organizer));
        assert!(!config.gate_codes().verify("5791", Role::Organizer));
        assert_eq!(config.notify.command.as_deref(), Some("msmtp -t"));
        assert_eq!(config.notify.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(
            WorkdayConfig::load(Some(path.as_path())),
            Err(WorkdayError::Config(_))
        ));
    }

    #[test]
    fn test_data_path_expands_tilde() {
        let config = WorkdayConfig::default();
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
    }
}
