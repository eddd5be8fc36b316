use std::path::{Path, PathBuf};

use common::prelude::MemoryPostStore;

use crate::http_server::body::JsonParser;
use crate::http_server::cors::{CorsPolicy, CorsPolicyError};
use crate::http_server::upload::{DiskStorage, SingleUpload};
use crate::http_server::{RouterSettings, UPLOAD_FIELD};
use crate::service_config::Config;

/// Main service state: the post store and the immutable router settings
#[derive(Debug, Clone)]
pub struct State {
    store: MemoryPostStore,
    settings: RouterSettings,
    upload_dir: PathBuf,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let cors = CorsPolicy::new(&config.allowed_origin)?;
        tracing::info!(origin = %config.allowed_origin, "CORS allowed origin");

        // The upload step never creates the directory
        if !config.upload_dir.is_dir() {
            tracing::warn!(
                path = %config.upload_dir.display(),
                "upload directory does not exist, uploads will fail until it is created"
            );
        }

        let settings = RouterSettings {
            json: JsonParser::new(config.json_limit_bytes),
            cors,
            upload: SingleUpload::new(UPLOAD_FIELD, DiskStorage::new(config.upload_dir.clone())),
        };

        Ok(Self {
            store: MemoryPostStore::new(),
            settings,
            upload_dir: config.upload_dir.clone(),
        })
    }

    pub fn store(&self) -> &MemoryPostStore {
        &self.store
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("invalid CORS configuration: {0}")]
    Cors(#[from] CorsPolicyError),
}
