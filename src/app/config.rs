use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CONFIG_FILE_NAME, DEFAULT_BACKEND_URL, ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS,
    LOCAL_CONFIG_PATH, PREFERENCES_FILE_NAME,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Local storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Output configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Remote backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API root, e.g. https://api.example.com/api
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Local storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Preference file location (defaults to the platform data dir)
    pub preferences_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the preference file path
    pub fn resolve_preferences_path(&self) -> Result<PathBuf> {
        match &self.preferences_path {
            Some(path) => Ok(path.clone()),
            None => Ok(get_data_dir()?.join(PREFERENCES_FILE_NAME)),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Colorize terminal output
    pub color: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join(CONFIG_FILE_NAME);
    let local_config = PathBuf::from(LOCAL_CONFIG_PATH);
    build_figment(&[global_config, local_config])
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from an explicit file, still honoring env overrides
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    build_figment(&[path.to_path_buf()])
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn build_figment(files: &[PathBuf]) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // CLINICDESK_BACKEND__BASE_URL=... style overrides
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

fn home_fallback(kind: &str) -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(kind).join(APP_NAME))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match project_dirs() {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => home_fallback(".config")?,
    };
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}

/// Get the data directory where the preference file lives
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = match project_dirs() {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => home_fallback(".local/share")?,
    };
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join(CONFIG_FILE_NAME),
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
///
/// Returns the path of the newly written file, or `None` if one was already there.
pub fn init_config() -> Result<Option<PathBuf>> {
    let config_file = get_config_dir()?.join(CONFIG_FILE_NAME);
    if config_file.exists() {
        return Ok(None);
    }
    save_config(&Config::default(), Some(config_file.clone()))?;
    Ok(Some(config_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[backend]
base_url = "https://clinic.example.com/api"
timeout_secs = 10
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend.base_url, "https://clinic.example.com/api");
        assert_eq!(config.backend.timeout_secs, 10);
        assert!(config.ui.color);
        assert!(config.storage.preferences_path.is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_from(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.storage.preferences_path = Some(dir.path().join("prefs.json"));
        config.ui.color = false;

        save_config(&config, Some(path.clone())).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.storage.preferences_path, config.storage.preferences_path);
        assert!(!loaded.ui.color);
    }

    #[test]
    fn test_explicit_preferences_path_wins() {
        let storage = StorageConfig {
            preferences_path: Some(PathBuf::from("/tmp/prefs.json")),
        };
        assert_eq!(
            storage.resolve_preferences_path().unwrap(),
            PathBuf::from("/tmp/prefs.json")
        );
    }
}
