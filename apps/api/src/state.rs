use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::skills::{PersistenceAdapter, SkillBoard, SkillGenerator};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Generation backend shared by every board. Default: LlmSkillGenerator.
    pub generator: Arc<dyn SkillGenerator>,
    /// Persistence mirror. Redis when REDIS_URL is set, in-memory otherwise.
    pub store: Arc<dyn PersistenceAdapter>,
    pub boards: Arc<BoardRegistry>,
}

struct BoardEntry {
    board: Arc<SkillBoard>,
    last_seen: Instant,
}

/// Live boards by id. One board per wizard instance.
#[derive(Default)]
pub struct BoardRegistry {
    boards: RwLock<HashMap<Uuid, BoardEntry>>,
}

impl BoardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, board: SkillBoard) -> Arc<SkillBoard> {
        let board = Arc::new(board);
        self.boards.write().await.insert(
            board.id(),
            BoardEntry {
                board: board.clone(),
                last_seen: Instant::now(),
            },
        );
        board
    }

    /// Looks a board up and marks it as recently used.
    pub async fn get(&self, board_id: Uuid) -> Result<Arc<SkillBoard>, AppError> {
        let mut boards = self.boards.write().await;
        let entry = boards.get_mut(&board_id).ok_or_else(|| not_found(board_id))?;
        entry.last_seen = Instant::now();
        Ok(entry.board.clone())
    }

    /// Removes a board and clears its mirrored keys.
    pub async fn remove(&self, board_id: Uuid) -> Result<(), AppError> {
        let entry = self
            .boards
            .write()
            .await
            .remove(&board_id)
            .ok_or_else(|| not_found(board_id))?;
        entry.board.close().await;
        Ok(())
    }

    /// Closes boards untouched for longer than `max_idle`. Boards with a
    /// generate call in flight are kept. Returns how many were evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let evicted: Vec<Arc<SkillBoard>> = {
            let mut boards = self.boards.write().await;
            let now = Instant::now();
            let stale: Vec<Uuid> = boards
                .iter()
                .filter(|(_, e)| {
                    now.duration_since(e.last_seen) > max_idle && !e.board.is_generating()
                })
                .map(|(id, _)| *id)
                .collect();
            stale
                .into_iter()
                .filter_map(|id| boards.remove(&id))
                .map(|e| e.board)
                .collect()
        };

        for board in &evicted {
            board.close().await;
        }
        if !evicted.is_empty() {
            info!("Evicted {} idle skill boards", evicted.len());
        }
        evicted.len()
    }

    /// Runs `evict_idle` every `every` until the process exits.
    pub fn spawn_sweeper(self: Arc<Self>, max_idle: Duration, every: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                self.evict_idle(max_idle).await;
            }
        });
    }
}

fn not_found(board_id: Uuid) -> AppError {
    AppError::NotFound(format!("Board {board_id} not found"))
}
