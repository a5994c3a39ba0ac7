//! # Terminal Configuration
//!
//! Settings loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --endpoint https://api.example.com  --scanner /dev/ttyACM0         │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     EVENTPOS_API_ENDPOINT, EVENTPOS_EMP_CD, EVENTPOS_STORE_CD,         │
//! │     EVENTPOS_POS_NO, EVENTPOS_EVENT_NAME, EVENTPOS_SCANNER_DEVICE      │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/eventpos-terminal/terminal.toml (Linux)                  │
//! │     or the path given with --config                                    │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     build-time endpoint, register 99999 / 30 / 90                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # terminal.toml
//! [api]
//! endpoint = "https://api.example.com"
//!
//! [register]
//! emp_cd = "99999"
//! store_cd = "30"
//! pos_no = "90"
//!
//! [event]
//! name = "秋の感謝祭"
//!
//! [scanner]
//! device = "/dev/ttyACM0"   # omit to use a keyboard-wedge scanner
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use eventpos_client::ApiConfig;
use eventpos_core::validation::validate_register_identity;
use eventpos_core::RegisterIdentity;

use crate::error::{AppError, AppResult};

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub scanner: Option<PathBuf>,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the event API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    ApiConfig::build_endpoint().to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            endpoint: default_endpoint(),
        }
    }
}

/// Register identity as written in the file; every field optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSettings {
    #[serde(default = "default_emp_cd")]
    pub emp_cd: String,
    #[serde(default = "default_store_cd")]
    pub store_cd: String,
    #[serde(default = "default_pos_no")]
    pub pos_no: String,
}

fn default_emp_cd() -> String {
    RegisterIdentity::default().emp_cd
}

fn default_store_cd() -> String {
    RegisterIdentity::default().store_cd
}

fn default_pos_no() -> String {
    RegisterIdentity::default().pos_no
}

impl Default for RegisterSettings {
    fn default() -> Self {
        let identity = RegisterIdentity::default();
        RegisterSettings {
            emp_cd: identity.emp_cd,
            store_cd: identity.store_cd,
            pos_no: identity.pos_no,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    /// Shown in the header: 『{name}』専用購入アプリ
    #[serde(default = "default_event_name")]
    pub name: String,
}

fn default_event_name() -> String {
    "イベント名称".to_string()
}

impl Default for EventSettings {
    fn default() -> Self {
        EventSettings {
            name: default_event_name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Device node or serial tty that emits one code per line.
    /// `None` means a keyboard-wedge scanner typing into the terminal.
    #[serde(default)]
    pub device: Option<PathBuf>,
}

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub register: RegisterSettings,

    #[serde(default)]
    pub event: EventSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,
}

impl TerminalConfig {
    /// Loads configuration from defaults, file, environment and flags.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`--config`, else the platform default path)
    /// 3. Environment variables
    /// 4. Command-line flags
    ///
    /// A missing default file is fine; a missing `--config` file is an error.
    pub fn load(cli: &CliOverrides) -> AppResult<Self> {
        Self::load_with(cli, |key| std::env::var(key).ok())
    }

    /// [`TerminalConfig::load`] with the environment read through `var`.
    pub fn load_with<F>(cli: &CliOverrides, var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match cli.config.clone() {
            Some(path) if !path.exists() => {
                return Err(AppError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(var);
        config.apply_cli_overrides(cli);
        config.validate()?;

        info!(
            endpoint = %config.api.endpoint,
            store = %config.register.store_cd,
            pos = %config.register.pos_no,
            scanner = ?config.scanner.device,
            "Terminal configured"
        );
        Ok(config)
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading terminal config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Checks everything that would otherwise fail on the first purchase.
    pub fn validate(&self) -> AppResult<()> {
        self.api_config()?;

        validate_register_identity(&self.identity())
            .map_err(|e| AppError::config(format!("Invalid register identity: {}", e)))?;

        if self.event.name.trim().is_empty() {
            return Err(AppError::config("event.name must not be empty"));
        }

        Ok(())
    }

    /// Applies `EVENTPOS_*` overrides read through `var`.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = var("EVENTPOS_API_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding API endpoint from environment");
            self.api.endpoint = endpoint;
        }

        if let Some(emp_cd) = var("EVENTPOS_EMP_CD") {
            self.register.emp_cd = emp_cd;
        }

        if let Some(store_cd) = var("EVENTPOS_STORE_CD") {
            self.register.store_cd = store_cd;
        }

        if let Some(pos_no) = var("EVENTPOS_POS_NO") {
            self.register.pos_no = pos_no;
        }

        if let Some(name) = var("EVENTPOS_EVENT_NAME") {
            self.event.name = name;
        }

        if let Some(device) = var("EVENTPOS_SCANNER_DEVICE") {
            debug!(device = %device, "Overriding scanner device from environment");
            self.scanner.device = Some(PathBuf::from(device));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(endpoint) = &cli.endpoint {
            self.api.endpoint = endpoint.clone();
        }
        if let Some(device) = &cli.scanner {
            self.scanner.device = Some(device.clone());
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("jp", "eventpos", "eventpos-terminal")
            .map(|dirs| dirs.config_dir().join("terminal.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn api_config(&self) -> AppResult<ApiConfig> {
        Ok(ApiConfig::new(&self.api.endpoint)?)
    }

    pub fn identity(&self) -> RegisterIdentity {
        RegisterIdentity {
            emp_cd: self.register.emp_cd.clone(),
            store_cd: self.register.store_cd.clone(),
            pos_no: self.register.pos_no.clone(),
        }
    }

    /// Header title, e.g. `『秋の感謝祭』専用購入アプリ`.
    pub fn title(&self) -> String {
        format!("『{}』専用購入アプリ", self.event.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = TerminalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.identity(), RegisterIdentity::default());
        assert_eq!(config.title(), "『イベント名称』専用購入アプリ");
        assert_eq!(config.scanner.device, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nendpoint = \"https://api.example.com\"\n\n[register]\npos_no = \"12\"\n"
        )
        .unwrap();

        let cli = CliOverrides {
            config: Some(file.path().to_path_buf()),
            ..CliOverrides::default()
        };
        let config = TerminalConfig::load_with(&cli, no_env).unwrap();

        assert_eq!(config.api.endpoint, "https://api.example.com");
        assert_eq!(config.register.pos_no, "12");
        assert_eq!(config.register.store_cd, "30");
        assert_eq!(config.event.name, "イベント名称");
    }

    #[test]
    fn test_load_layers_file_env_and_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nendpoint = \"https://file.example.com\"\n\n[register]\nstore_cd = \"31\"\n"
        )
        .unwrap();
        let env: HashMap<&str, &str> = [
            ("EVENTPOS_API_ENDPOINT", "https://env.example.com"),
            ("EVENTPOS_STORE_CD", "45"),
        ]
        .into_iter()
        .collect();

        let cli = CliOverrides {
            config: Some(file.path().to_path_buf()),
            endpoint: Some("https://cli.example.com".to_string()),
            ..CliOverrides::default()
        };
        let config =
            TerminalConfig::load_with(&cli, |key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.api.endpoint, "https://cli.example.com");
        assert_eq!(config.register.store_cd, "45");
        assert_eq!(config.register.pos_no, "90");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliOverrides {
            config: Some(dir.path().join("nope.toml")),
            ..CliOverrides::default()
        };
        let err = TerminalConfig::load_with(&cli, no_env).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
    }

    #[test]
    fn test_env_then_cli_priority() {
        let env: HashMap<&str, &str> = [
            ("EVENTPOS_API_ENDPOINT", "http://env.example.com"),
            ("EVENTPOS_EMP_CD", "00123"),
            ("EVENTPOS_EVENT_NAME", "秋の感謝祭"),
            ("EVENTPOS_SCANNER_DEVICE", "/dev/ttyACM0"),
        ]
        .into_iter()
        .collect();

        let mut config = TerminalConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api.endpoint, "http://env.example.com");
        assert_eq!(config.register.emp_cd, "00123");
        assert_eq!(config.title(), "『秋の感謝祭』専用購入アプリ");

        config.apply_cli_overrides(&CliOverrides {
            endpoint: Some("http://cli.example.com".to_string()),
            scanner: Some(PathBuf::from("/dev/ttyUSB1")),
            ..CliOverrides::default()
        });
        assert_eq!(config.api.endpoint, "http://cli.example.com");
        assert_eq!(config.scanner.device, Some(PathBuf::from("/dev/ttyUSB1")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = TerminalConfig::default();
        config.api.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = TerminalConfig::default();
        config.register.emp_cd = "12".to_string();
        assert!(config.validate().is_err());

        let mut config = TerminalConfig::default();
        config.event.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_has_sections() {
        let toml_str = toml::to_string_pretty(&TerminalConfig::default()).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[register]"));
        assert!(toml_str.contains("[event]"));
    }
}
