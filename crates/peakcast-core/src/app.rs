use anyhow::Result;
use std::sync::Arc;

use crate::Config;

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        let (config, _warnings) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    /// Create an application instance around an already-loaded configuration
    pub fn with_config(config: Config) -> Self {
        tracing::info!(
            "Using API at {} (timeout {}s)",
            config.api.base_url,
            config.api.timeout_secs
        );
        Self {
            config: Arc::new(config),
        }
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the application config
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}
