//! Usage record storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::TokenUsage;
use crate::utils::error::Result;

/// One row per completed AI operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: Uuid,
    pub user_id: String,
    pub provider: String,
    pub model: String,
    /// "improve" or "generate"
    pub operation: String,
    pub usage: TokenUsage,
    pub cost: f64,
    pub latency_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl UsageRecord {
    pub fn new(
        user_id: &str,
        operation: &str,
        response: &crate::core::types::GenerationResponse,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            provider: response.provider.clone(),
            model: response.model.clone(),
            operation: operation.to_string(),
            usage: response.usage,
            cost: response.cost,
            latency_ms: response.latency_ms,
            created_at: Utc::now(),
        }
    }
}

/// Usage record persistence interface
#[async_trait]
pub trait UsageStore: Send + Sync {
    async fn append(&self, record: UsageRecord) -> Result<()>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<UsageRecord>>;
    async fn count(&self) -> Result<usize>;
}

/// In-memory usage log
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    records: RwLock<Vec<UsageRecord>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn append(&self, record: UsageRecord) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<UsageRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}
