//! Persistence Adapter: a durable key-value mirror of each board's
//! recommended pool and session token.
//!
//! The mirror is write-only from the engine's point of view: boards are never
//! rehydrated from it. `read` exists for inspection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::skills::models::RecommendedSkill;
use crate::skills::session::SessionToken;

const KEY_PREFIX: &str = "skillboard";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }
}

#[async_trait]
impl PersistenceAdapter for RedisStore {
    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, payload).await?;
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        Ok(raw.map(|s| serde_json::from_str(&s)).transpose()?)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

/// In-process store, used when no Redis URL is configured.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryStore {
    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSnapshot {
    pub session_token: SessionToken,
    pub recommended: Vec<RecommendedSkill>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: SessionToken,
    pub minted_at: DateTime<Utc>,
}

pub fn recommended_key(board_id: Uuid) -> String {
    format!("{KEY_PREFIX}:{board_id}:recommended")
}

pub fn session_key(board_id: Uuid) -> String {
    format!("{KEY_PREFIX}:{board_id}:session")
}

/// What the mirror currently holds for one board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorView {
    pub recommended: Option<RecommendedSnapshot>,
    pub session: Option<SessionRecord>,
}

/// One board's view of the store. Write failures are logged, never raised:
/// losing a mirror write must not break the wizard.
#[derive(Clone)]
pub struct BoardMirror {
    board_id: Uuid,
    store: Arc<dyn PersistenceAdapter>,
}

impl BoardMirror {
    pub fn new(board_id: Uuid, store: Arc<dyn PersistenceAdapter>) -> Self {
        Self { board_id, store }
    }

    pub async fn write_recommended(&self, token: SessionToken, recommended: &[RecommendedSkill]) {
        let snapshot = RecommendedSnapshot {
            session_token: token,
            recommended: recommended.to_vec(),
            saved_at: Utc::now(),
        };
        self.write(&recommended_key(self.board_id), &snapshot).await;
    }

    pub async fn write_session(&self, token: SessionToken, minted_at: DateTime<Utc>) {
        let record = SessionRecord { token, minted_at };
        self.write(&session_key(self.board_id), &record).await;
    }

    /// Deletes every mirrored key of this board.
    pub async fn clear(&self) {
        for key in [recommended_key(self.board_id), session_key(self.board_id)] {
            if let Err(e) = self.store.remove(&key).await {
                warn!("Failed to remove mirrored key {key}: {e}");
            }
        }
    }

    pub async fn inspect(&self) -> Result<MirrorView, StoreError> {
        let recommended = self
            .store
            .read(&recommended_key(self.board_id))
            .await?
            .map(serde_json::from_value)
            .transpose()?;
        let session = self
            .store
            .read(&session_key(self.board_id))
            .await?
            .map(serde_json::from_value)
            .transpose()?;
        Ok(MirrorView {
            recommended,
            session,
        })
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize mirror value for {key}: {e}");
                return;
            }
        };
        if let Err(e) = self.store.write(key, &value).await {
            warn!("Failed to mirror {key}: {e}");
        }
    }
}
