//! Application state shared across HTTP handlers

use std::sync::Arc;

use crate::config::Config;
use crate::core::quota::QuotaTracker;
use crate::core::router::ProviderManager;
use crate::storage::{MemoryPromptStore, MemoryUsageStore, PromptStore, UsageStore};
use crate::utils::error::Result;

/// Shared resources handed to every handler via `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: Arc<ProviderManager>,
    pub quota: Arc<QuotaTracker>,
    pub prompts: Arc<dyn PromptStore>,
    pub usage: Arc<dyn UsageStore>,
}

impl AppState {
    /// Wire state from configuration with in-memory stores
    pub fn from_config(config: Config) -> Result<Self> {
        let manager = crate::core::factory::build_manager(&config)?;
        Ok(Self {
            quota: Arc::new(QuotaTracker::new(config.quota)),
            config: Arc::new(config),
            manager: Arc::new(manager),
            prompts: Arc::new(MemoryPromptStore::new()),
            usage: Arc::new(MemoryUsageStore::new()),
        })
    }
}
