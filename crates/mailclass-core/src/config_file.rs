use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ClassificationOptions, ConfigError, Provider};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub backend: Option<BackendConfig>,
    pub defaults: Option<DefaultsConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Initial values for the classification options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub provider: Option<String>,
    pub stemming: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/mailclass/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mailclass").join("config.toml"))
}

/// Project-local override file, looked up in the working directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".mailclass.toml")
}

/// Load config by cascading CWD `.mailclass.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&local_config_path());

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        backend: Some(BackendConfig {
            base_url: overlay
                .backend
                .as_ref()
                .and_then(|b| b.base_url.clone())
                .or_else(|| base.backend.as_ref().and_then(|b| b.base_url.clone())),
            timeout_secs: overlay
                .backend
                .as_ref()
                .and_then(|b| b.timeout_secs)
                .or_else(|| base.backend.as_ref().and_then(|b| b.timeout_secs)),
        }),
        defaults: Some(DefaultsConfig {
            provider: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.provider.clone())
                .or_else(|| base.defaults.as_ref().and_then(|d| d.provider.clone())),
            stemming: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.stemming)
                .or_else(|| base.defaults.as_ref().and_then(|d| d.stemming)),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
    }
}

/// Initial classification options from the `[defaults]` section.
pub fn initial_options(config: &ConfigFile) -> Result<ClassificationOptions, ConfigError> {
    let defaults = config.defaults.as_ref();
    let provider = match defaults.and_then(|d| d.provider.as_deref()) {
        Some(name) => name
            .parse::<Provider>()
            .map_err(|_| ConfigError::InvalidProvider(name.to_string()))?,
        None => Provider::default(),
    };
    Ok(ClassificationOptions {
        stemming_enabled: defaults.and_then(|d| d.stemming).unwrap_or(false),
        provider,
    })
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}
