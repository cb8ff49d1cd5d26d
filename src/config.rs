//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/budgetctl/budgetctl.toml`
//! 3. Environment variables: `BUDGETCTL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::budget_api::DEFAULT_API_URL;

/// Token file name inside the data directory.
pub const TOKEN_FILE: &str = "budget-token";

/// Unified configuration for budgetctl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Budget service endpoint
    pub api_url: String,
    /// Local client state holding models.yaml and environments/ (default: ~/.local/share/juju)
    pub data_dir: PathBuf,
    /// Default model as `[<controller>:]<model>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Account to use instead of the controller's current one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Macaroon presented to the budget service; read from `<data_dir>/budget-token` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            model: None,
            account: None,
            token: None,
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub account: Option<String>,
    pub token: Option<String>,
}

fn default_data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".local/share/juju"))
        .unwrap_or_else(|| PathBuf::from("~/.local/share/juju"))
}

/// Get the XDG config directory for budgetctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "budgetctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("budgetctl.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Path of the token file used when no token is configured.
    pub fn token_file(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in `data_dir`.
    fn expand_paths(&mut self) {
        let raw = self.data_dir.to_string_lossy().to_string();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.data_dir = PathBuf::from(expanded.as_ref());
        }
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            api_url: overlay
                .api_url
                .clone()
                .unwrap_or_else(|| self.api_url.clone()),
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            model: overlay.model.clone().or_else(|| self.model.clone()),
            account: overlay.account.clone().or_else(|| self.account.clone()),
            token: overlay.token.clone().or_else(|| self.token.clone()),
        }
    }

    /// Load settings with layered precedence from the XDG config location.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with an explicit global config file.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load_from(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply BUDGETCTL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("BUDGETCTL"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("api_url") {
            settings.api_url = val;
        }
        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("model") {
            settings.model = Some(val);
        }
        if let Ok(val) = config.get_string("account") {
            settings.account = Some(val);
        }
        if let Ok(val) = config.get_string("token") {
            settings.token = Some(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML, with the token masked.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        if shown.token.is_some() {
            shown.token = Some("********".into());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# budgetctl configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/budgetctl/budgetctl.toml
#   Env:    BUDGETCTL_* environment variables

# Budget service endpoint
# api_url = "{DEFAULT_API_URL}"

# Local client state (models.yaml, environments/*.jenv, budget-token)
# data_dir = "~/.local/share/juju"

# Default model, [<controller>:]<model>
# model = "mycontroller:default"

# Account, when not the controller's current one
# account = "admin@local"
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
