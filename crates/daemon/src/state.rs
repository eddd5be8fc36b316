use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::body::DEFAULT_JSON_LIMIT_BYTES;
use crate::http_server::cors::DEFAULT_ALLOWED_ORIGIN;
use crate::http_server::upload::DEFAULT_UPLOAD_DIR;

pub const APP_NAME: &str = "posts";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_port")]
    pub port: u16,
    /// The single origin browsers may call the API from
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    /// Directory uploads are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Maximum accepted size of a JSON request body
    #[serde(default = "default_json_limit_bytes")]
    pub json_limit_bytes: usize,
    /// Directory for rolling log files (stdout only if not set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origin() -> String {
    DEFAULT_ALLOWED_ORIGIN.to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from(DEFAULT_UPLOAD_DIR)
}

fn default_json_limit_bytes() -> usize {
    DEFAULT_JSON_LIMIT_BYTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origin: default_allowed_origin(),
            upload_dir: default_upload_dir(),
            json_limit_bytes: default_json_limit_bytes(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the posts directory (~/.posts)
    pub posts_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the posts directory path (custom or default ~/.posts)
    pub fn posts_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new posts directory and the upload directory
    ///  named by the config
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let posts_dir = Self::posts_dir(custom_path)?;

        if posts_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&posts_dir)?;

        let config = config.unwrap_or_default();
        fs::create_dir_all(&config.upload_dir)?;

        let config_path = posts_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            posts_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the posts directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let posts_dir = Self::posts_dir(custom_path)?;

        if !posts_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = posts_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            posts_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("posts directory not initialized. Run 'posts init' first")]
    NotInitialized,

    #[error("posts directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
