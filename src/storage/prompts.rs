//! Prompt template storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::utils::error::{GatewayError, Result};

/// A saved prompt template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Public templates are readable by any user
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a template
#[derive(Debug, Clone, Deserialize)]
pub struct NewPromptTemplate {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Partial update; unset fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Prompt template persistence interface
#[async_trait]
pub trait PromptStore: Send + Sync {
    async fn create(&self, user_id: &str, new: NewPromptTemplate) -> Result<PromptTemplate>;
    async fn get(&self, id: Uuid) -> Result<Option<PromptTemplate>>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PromptTemplate>>;
    async fn list_public(&self) -> Result<Vec<PromptTemplate>>;
    /// Update a template; only the owner may update
    async fn update(&self, id: Uuid, user_id: &str, update: PromptUpdate)
        -> Result<PromptTemplate>;
    /// Delete a template; only the owner may delete
    async fn delete(&self, id: Uuid, user_id: &str) -> Result<()>;
    /// Toggle public visibility; only the owner may share
    async fn set_visibility(
        &self,
        id: Uuid,
        user_id: &str,
        is_public: bool,
    ) -> Result<PromptTemplate>;
}

/// In-memory template store
#[derive(Debug, Default)]
pub struct MemoryPromptStore {
    templates: RwLock<HashMap<Uuid, PromptTemplate>>,
}

impl MemoryPromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_entry(
        templates: &HashMap<Uuid, PromptTemplate>,
        id: Uuid,
        user_id: &str,
    ) -> Result<()> {
        let template = templates
            .get(&id)
            .ok_or_else(|| GatewayError::NotFound(format!("prompt {}", id)))?;
        if template.user_id != user_id {
            return Err(GatewayError::Forbidden(
                "prompt belongs to another user".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PromptStore for MemoryPromptStore {
    async fn create(&self, user_id: &str, new: NewPromptTemplate) -> Result<PromptTemplate> {
        let now = Utc::now();
        let template = PromptTemplate {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: new.title,
            content: new.content,
            description: new.description,
            tags: new.tags,
            is_public: new.is_public,
            created_at: now,
            updated_at: now,
        };
        self.templates
            .write()
            .insert(template.id, template.clone());
        Ok(template)
    }

    async fn get(&self, id: Uuid) -> Result<Option<PromptTemplate>> {
        Ok(self.templates.read().get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PromptTemplate>> {
        let mut templates: Vec<_> = self
            .templates
            .read()
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    async fn list_public(&self) -> Result<Vec<PromptTemplate>> {
        let mut templates: Vec<_> = self
            .templates
            .read()
            .values()
            .filter(|t| t.is_public)
            .cloned()
            .collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: &str,
        update: PromptUpdate,
    ) -> Result<PromptTemplate> {
        let mut templates = self.templates.write();
        Self::owned_entry(&templates, id, user_id)?;
        let template = templates.get_mut(&id).expect("checked above");

        if let Some(title) = update.title {
            template.title = title;
        }
        if let Some(content) = update.content {
            template.content = content;
        }
        if let Some(description) = update.description {
            template.description = Some(description);
        }
        if let Some(tags) = update.tags {
            template.tags = tags;
        }
        template.updated_at = Utc::now();
        Ok(template.clone())
    }

    async fn delete(&self, id: Uuid, user_id: &str) -> Result<()> {
        let mut templates = self.templates.write();
        Self::owned_entry(&templates, id, user_id)?;
        templates.remove(&id);
        Ok(())
    }

    async fn set_visibility(
        &self,
        id: Uuid,
        user_id: &str,
        is_public: bool,
    ) -> Result<PromptTemplate> {
        let mut templates = self.templates.write();
        Self::owned_entry(&templates, id, user_id)?;
        let template = templates.get_mut(&id).expect("checked above");
        template.is_public = is_public;
        template.updated_at = Utc::now();
        Ok(template.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_template(title: &str, is_public: bool) -> NewPromptTemplate {
        NewPromptTemplate {
            title: title.to_string(),
            content: "content".to_string(),
            description: None,
            tags: vec!["test".to_string()],
            is_public,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryPromptStore::new();
        let created = store
            .create("alice", new_template("my prompt", false))
            .await
            .unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "my prompt");
        assert_eq!(fetched.user_id, "alice");
    }

    #[tokio::test]
    async fn test_listing_scopes() {
        let store = MemoryPromptStore::new();
        store
            .create("alice", new_template("private", false))
            .await
            .unwrap();
        store
            .create("alice", new_template("shared", true))
            .await
            .unwrap();
        store
            .create("bob", new_template("bobs", false))
            .await
            .unwrap();

        assert_eq!(store.list_for_user("alice").await.unwrap().len(), 2);
        let public = store.list_public().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].title, "shared");
    }

    #[tokio::test]
    async fn test_update_enforces_ownership() {
        let store = MemoryPromptStore::new();
        let created = store
            .create("alice", new_template("t", false))
            .await
            .unwrap();

        let err = store
            .update(created.id, "bob", PromptUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Forbidden(_)));

        let updated = store
            .update(
                created.id,
                "alice",
                PromptUpdate {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, "content");
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let store = MemoryPromptStore::new();
        let created = store
            .create("alice", new_template("t", false))
            .await
            .unwrap();
        store.delete(created.id, "alice").await.unwrap();
        assert!(store.get(created.id).await.unwrap().is_none());

        let err = store.delete(created.id, "alice").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_share_toggles_visibility() {
        let store = MemoryPromptStore::new();
        let created = store
            .create("alice", new_template("t", false))
            .await
            .unwrap();
        let shared = store
            .set_visibility(created.id, "alice", true)
            .await
            .unwrap();
        assert!(shared.is_public);
        assert_eq!(store.list_public().await.unwrap().len(), 1);
    }
}
