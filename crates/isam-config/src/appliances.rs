//! Appliance contexts.
//!
//! ```yaml
//! api-version: v1
//! kind: ApplianceConfig
//!
//! current-context: lab
//!
//! contexts:
//!   - name: lab
//!     hostname: https://isam.lab.local
//!     user: admin@local
//!     password-env: ISAM_LAB_PASSWORD
//!     model: Docker
//!     accept-invalid-certs: true
//!   - name: prod
//!     hostname: isam.example.com
//!     port: 8443
//!     user: admin@local
//!     password-file: ~/.config/isam/prod.pw
//!     model: Docker
//!     version: 10.0.6.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::expand_path;
use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Appliance Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the config file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for config files.
pub const KIND: &str = "ApplianceConfig";

/// Default config filename.
const CONFIG_FILE: &str = "appliances.yaml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplianceConfig {
    /// API version (always "v1" currently).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Config kind (always "ApplianceConfig").
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the current/default context.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Named appliance contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Default settings applied to all contexts.
    #[serde(default)]
    pub defaults: ApplianceDefaults,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ApplianceConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Get the current context, if set and valid.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    /// Get a context by name.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Get a mutable context by name.
    pub fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Resolve a context by explicit name, falling back to the current one.
    pub fn resolve(&self, name: Option<&str>) -> Result<&Context> {
        match name {
            Some(name) => self
                .get_context(name)
                .ok_or_else(|| ConfigError::ContextNotFound(name.to_string())),
            None => {
                let current = self
                    .current_context
                    .as_deref()
                    .ok_or(ConfigError::NoCurrentContext)?;
                self.get_context(current)
                    .ok_or_else(|| ConfigError::ContextNotFound(current.to_string()))
            }
        }
    }

    /// Add or update a context.
    pub fn set_context(&mut self, context: Context) {
        if let Some(existing) = self.get_context_mut(&context.name) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
    }

    /// Remove a context by name.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let pos = self.contexts.iter().position(|c| c.name == name)?;
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(self.contexts.remove(pos))
    }

    /// Set the current context by name.
    ///
    /// Returns an error if the context doesn't exist.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_some() {
            self.current_context = Some(name.to_string());
            Ok(())
        } else {
            Err(ConfigError::ContextNotFound(name.to_string()))
        }
    }

    /// List all context names.
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Effective request timeout (seconds) for a context.
    pub fn timeout_for(&self, context: &Context) -> u64 {
        context.timeout.unwrap_or(self.defaults.timeout)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named appliance connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    /// Unique name for this context.
    pub name: String,

    /// Management hostname or URL.
    pub hostname: String,

    /// Management port (defaults to 443).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Administrator user.
    pub user: String,

    /// Path to a file containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,

    /// Environment variable containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Inline password. Prefer `password-file` or `password-env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Deployment model (e.g. "Docker").
    pub model: String,

    /// Firmware version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Activated product modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Request timeout override (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Context {
    /// Create a new context.
    pub fn new(
        name: impl Into<String>,
        hostname: impl Into<String>,
        user: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            port: None,
            user: user.into(),
            password_file: None,
            password_env: None,
            password: None,
            model: model.into(),
            version: None,
            modules: Vec::new(),
            accept_invalid_certs: false,
            timeout: None,
        }
    }

    /// Read the password from a file.
    pub fn with_password_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.password_file = Some(path.into());
        self
    }

    /// Read the password from an environment variable.
    pub fn with_password_env(mut self, var: impl Into<String>) -> Self {
        self.password_env = Some(var.into());
        self
    }

    /// Set the firmware version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Resolve the password: file, then environment variable, then inline.
    pub fn resolve_password(&self) -> Result<String> {
        if let Some(path) = &self.password_file {
            let expanded = expand_path(path);
            if expanded.exists() {
                let password = std::fs::read_to_string(&expanded)
                    .map_err(|e| ConfigError::ReadFile {
                        path: expanded.display().to_string(),
                        source: e,
                    })?
                    .trim()
                    .to_string();
                return Ok(password);
            }
            tracing::debug!(path = %expanded.display(), "Password file not found");
        }
        if let Some(var) = &self.password_env
            && let Ok(password) = std::env::var(var)
        {
            return Ok(password);
        }
        if let Some(password) = &self.password {
            tracing::warn!(context = %self.name, "Using plaintext password from config file");
            return Ok(password.clone());
        }
        Err(ConfigError::PasswordNotFound(self.name.clone()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default settings applied to all contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApplianceDefaults {
    /// Default request timeout in seconds.
    pub timeout: u64,
}

impl Default for ApplianceDefaults {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Get the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    crate::xdg_config_dir().map(|d| d.join(CONFIG_FILE))
}

/// Load the configuration.
///
/// Returns an empty config if the file doesn't exist.
pub fn load_config() -> Result<ApplianceConfig> {
    load_config_from(config_path().as_deref())
}

/// Load config from a specific path.
pub fn load_config_from(path: Option<&Path>) -> Result<ApplianceConfig> {
    let Some(path) = path else {
        return Ok(ApplianceConfig::new());
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using empty config");
        return Ok(ApplianceConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ApplianceConfig::from_yaml(&contents)
}

/// Save the configuration.
pub fn save_config(config: &ApplianceConfig) -> Result<()> {
    let path = config_path()
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))?;
    save_config_to(config, &path)
}

/// Save config to a specific path.
pub fn save_config_to(config: &ApplianceConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
