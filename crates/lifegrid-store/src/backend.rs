//! Durable backend trait and the backends shipped with the service.
//!
//! The durable store is a narrow, pluggable seam: the repository only ever
//! inserts a record and fetches one by id. `MemoryStore` backs tests and
//! ephemeral deployments; `JsonFileStore` persists one JSON document per
//! board under a data directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::record::BoardRecord;

/// Durable storage for board records.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Persist a record. Inserting is atomic: on error nothing is stored.
    async fn insert(&self, record: &BoardRecord) -> StoreResult<()>;

    /// Fetch a record by id; `None` when absent.
    async fn fetch(&self, board_id: &str) -> StoreResult<Option<BoardRecord>>;
}

/// In-memory durable store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, BoardRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn insert(&self, record: &BoardRecord) -> StoreResult<()> {
        self.records
            .write()
            .await
            .insert(record.board_id.clone(), record.clone());
        Ok(())
    }

    async fn fetch(&self, board_id: &str) -> StoreResult<Option<BoardRecord>> {
        Ok(self.records.read().await.get(board_id).cloned())
    }
}

/// File-backed durable store: one `{board_id}.json` per record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    boards_dir: PathBuf,
}

impl JsonFileStore {
    /// Subdirectory holding board documents.
    const BOARDS_DIR: &'static str = "boards";

    /// Create a store rooted at the given data directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            boards_dir: data_dir.as_ref().join(Self::BOARDS_DIR),
        }
    }

    /// Path of the data directory for board documents.
    pub fn boards_dir(&self) -> &Path {
        &self.boards_dir
    }

    fn record_path(&self, board_id: &str) -> StoreResult<PathBuf> {
        // Ids are minted as UUIDs; anything else never names a document.
        let well_formed = !board_id.is_empty()
            && board_id
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c == '-');
        if !well_formed {
            return Err(StoreError::backend(format!(
                "malformed board id: {board_id:?}"
            )));
        }
        Ok(self.boards_dir.join(format!("{board_id}.json")))
    }
}

#[async_trait]
impl DurableStore for JsonFileStore {
    async fn insert(&self, record: &BoardRecord) -> StoreResult<()> {
        let path = self.record_path(&record.board_id)?;
        std::fs::create_dir_all(&self.boards_dir)
            .map_err(|e| StoreError::backend(format!("create {:?}: {e}", self.boards_dir)))?;

        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, &json)
            .map_err(|e| StoreError::backend(format!("write {path:?}: {e}")))?;

        info!(
            board_id = %record.board_id,
            path = %path.display(),
            live = record.state.len(),
            "board_record_persisted"
        );
        Ok(())
    }

    async fn fetch(&self, board_id: &str) -> StoreResult<Option<BoardRecord>> {
        let path = self.record_path(board_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::backend(format!("read {path:?}: {e}")))?;
        let record: BoardRecord = serde_json::from_str(&json)?;

        debug!(board_id, path = %path.display(), "board_record_loaded");
        Ok(Some(record))
    }
}
