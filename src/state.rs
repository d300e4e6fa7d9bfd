//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::error::LogError;
use crate::flash::{FlashSigner, InvalidKey};
use crate::submission::{SubmissionLog, SubmissionStore};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to open submission log: {0}")]
    Log(#[from] LogError),

    #[error("Failed to initialize flash signing: {0}")]
    FlashKey(#[from] InvalidKey),
}

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: SubmissionStore,
    log: SubmissionLog,
    flash: FlashSigner,
}

impl AppState {
    /// Create a new application state
    ///
    /// Opens the submission log for appending.
    pub async fn new(config: Config) -> Result<Self, StateError> {
        let log = SubmissionLog::open(config.uploads.log_path.clone()).await?;
        let flash = FlashSigner::new(config.secret_key.as_bytes())?;
        let store = SubmissionStore::new(config.uploads.root.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                log,
                flash,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the submission store
    pub fn store(&self) -> &SubmissionStore {
        &self.inner.store
    }

    /// Get the submission log
    pub fn log(&self) -> &SubmissionLog {
        &self.inner.log
    }

    /// Get the flash message signer
    pub fn flash(&self) -> &FlashSigner {
        &self.inner.flash
    }
}
