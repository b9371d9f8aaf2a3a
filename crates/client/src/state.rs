use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, Deployment};

pub const APP_NAME: &str = "strata";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Composite API key; `--api-key` / `STRATA_API_KEY` take precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub deployment: Deployment,
    /// Explicit API host, overrides the deployment default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl AppConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            deployment: self.deployment,
            host: self.host.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the strata directory (~/.strata)
    pub strata_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the strata directory path (custom or default ~/.strata)
    pub fn strata_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    pub fn exists(custom_path: Option<PathBuf>) -> Result<bool, StateError> {
        let config_path = Self::strata_dir(custom_path)?.join(CONFIG_FILE_NAME);
        Ok(config_path.exists())
    }

    /// Write a fresh config file, refusing to overwrite an existing one
    pub fn init(custom_path: Option<PathBuf>, config: AppConfig) -> Result<Self, StateError> {
        let strata_dir = Self::strata_dir(custom_path)?;
        let config_path = strata_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&strata_dir)?;
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        Ok(Self {
            strata_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the strata directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let strata_dir = Self::strata_dir(custom_path)?;
        let config_path = strata_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            strata_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("strata directory not initialized. Run 'strata init' first")]
    NotInitialized,

    #[error("strata directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata");
        let config = AppConfig {
            api_key: Some("k.0.u.h.e".to_string()),
            deployment: Deployment::Production,
            host: None,
        };

        assert!(!AppState::exists(Some(path.clone())).unwrap());
        let state = AppState::init(Some(path.clone()), config.clone()).unwrap();
        assert_eq!(state.config_path, path.join(CONFIG_FILE_NAME));
        assert!(AppState::exists(Some(path.clone())).unwrap());

        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.config, config);
        assert_eq!(loaded.config.client_config(), ClientConfig::production());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = Some(dir.path().to_path_buf());
        AppState::init(path.clone(), AppConfig::default()).unwrap();
        let err = AppState::init(path, AppConfig::default()).unwrap_err();
        assert!(matches!(err, StateError::AlreadyInitialized));
    }

    #[test]
    fn test_load_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppState::load(Some(dir.path().join("missing"))).unwrap_err();
        assert!(matches!(err, StateError::NotInitialized));
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "host = \"https://h/api\"\n").unwrap();

        let state = AppState::load(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(state.config.api_key, None);
        assert_eq!(state.config.deployment, Deployment::Local);
        assert_eq!(
            state.config.client_config().base_url().unwrap().as_str(),
            "https://h/api/"
        );
    }
}
