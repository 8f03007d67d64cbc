//! The board repository: dense/sparse translation, id minting, and the
//! read-through / write-through tiering over the durable store and the
//! shared cache.
//!
//! The cache tier is advisory everywhere: cache failures are logged and
//! swallowed, and a cold cache only costs recomputation. The durable
//! backend is authoritative; its failures surface to the caller.

use std::sync::Arc;
use std::time::Duration;

use lifegrid_core::Board;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::DurableStore;
use crate::cache::SharedCache;
use crate::error::{StoreError, StoreResult};
use crate::record::BoardRecord;

/// Time-to-live per cache key family (defaults: 1 h / 24 h / 7 d).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheTtls {
    /// TTL for `board:{id}:current`.
    pub current: Duration,
    /// TTL for `board:{id}:generation:{G}`.
    pub generation: Duration,
    /// TTL for the reserved `board:{id}:final` key.
    pub final_state: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            current: Duration::from_secs(3600),
            generation: Duration::from_secs(86_400),
            final_state: Duration::from_secs(604_800),
        }
    }
}

/// Cache key for a board's current (seed) state.
pub fn current_key(board_id: &str) -> String {
    format!("board:{board_id}:current")
}

/// Cache key for a computed generation.
pub fn generation_key(board_id: &str, generation: u64) -> String {
    format!("board:{board_id}:generation:{generation}")
}

/// Cache key reserved for a future final-state cache.
pub fn final_key(board_id: &str) -> String {
    format!("board:{board_id}:final")
}

/// Intermediate generations are written through at this stride while
/// advancing to a requested generation.
const INTERMEDIATE_CACHE_STRIDE: u64 = 10;

/// Repository over a durable store and a shared cache.
pub struct BoardRepository {
    store: Arc<dyn DurableStore>,
    cache: Arc<dyn SharedCache>,
    ttls: CacheTtls,
}

impl BoardRepository {
    /// Create a repository over the given backends.
    pub fn new(
        store: Arc<dyn DurableStore>,
        cache: Arc<dyn SharedCache>,
        ttls: CacheTtls,
    ) -> Self {
        Self { store, cache, ttls }
    }

    /// Validate and persist a seed board, returning the minted id.
    ///
    /// On backend failure nothing is stored and the id is discarded; a
    /// subsequent `get_board` for it would return `NotFound`.
    pub async fn create_board(&self, dense: &[Vec<u8>]) -> StoreResult<String> {
        let board = Board::from_dense(dense)?;
        let board_id = Uuid::new_v4().to_string();
        let record = BoardRecord::new(board_id.clone(), &board);

        self.store.insert(&record).await?;
        self.cache_record(&record).await;

        info!(
            board_id = %record.board_id,
            dims = %board.dimensions(),
            live = board.live_count(),
            "board_created"
        );
        Ok(board_id)
    }

    /// Fetch a board record, reading through the cache.
    ///
    /// Cache hit deserialises and returns; miss or cache failure falls
    /// back to the durable store, repopulating the cache on success.
    pub async fn get_board(&self, board_id: &str) -> StoreResult<BoardRecord> {
        let key = current_key(board_id);
        match self.cache.get(&key).await {
            Ok(Some(json)) => match serde_json::from_str::<BoardRecord>(&json) {
                Ok(record) => return Ok(record),
                Err(e) => warn!(key, error = %e, "cache_payload_invalid"),
            },
            Ok(None) => {}
            Err(e) => warn!(key, error = %e, "cache_read_failed"),
        }

        let record = self
            .store
            .fetch(board_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                board_id: board_id.to_string(),
            })?;

        self.cache_record(&record).await;
        Ok(record)
    }

    /// Dense state one generation after the seed.
    pub async fn get_next_generation(&self, board_id: &str) -> StoreResult<Vec<Vec<u8>>> {
        self.get_state_at_generation(board_id, 1).await
    }

    /// Dense state `generation` steps after the seed (`generation >= 1`).
    ///
    /// Served from `board:{id}:generation:{G}` when cached; otherwise the
    /// board is advanced from the seed, writing through every 10th
    /// intermediate generation and always the requested one.
    pub async fn get_state_at_generation(
        &self,
        board_id: &str,
        generation: u64,
    ) -> StoreResult<Vec<Vec<u8>>> {
        if generation == 0 {
            return Err(StoreError::InvalidGeneration { value: 0 });
        }

        let key = generation_key(board_id, generation);
        if let Some(dense) = self.cached_dense(&key).await {
            return Ok(dense);
        }

        let record = self.get_board(board_id).await?;
        let mut board = record.to_board()?;

        for step in 1..=generation {
            board = board.next_generation();
            if step < generation && step % INTERMEDIATE_CACHE_STRIDE == 0 {
                self.cache_dense(&generation_key(board_id, step), &board.to_dense())
                    .await;
            }
        }

        let dense = board.to_dense();
        self.cache_dense(&key, &dense).await;
        Ok(dense)
    }

    // Cache helpers: failures are recorded, never propagated.

    async fn cache_record(&self, record: &BoardRecord) {
        let key = current_key(&record.board_id);
        match serde_json::to_string(record) {
            Ok(json) => {
                if let Err(e) = self.cache.set(&key, json, self.ttls.current).await {
                    warn!(key, error = %e, "cache_write_failed");
                }
            }
            Err(e) => warn!(key, error = %e, "cache_encode_failed"),
        }
    }

    async fn cache_dense(&self, key: &str, dense: &[Vec<u8>]) {
        match serde_json::to_string(dense) {
            Ok(json) => {
                if let Err(e) = self.cache.set(key, json, self.ttls.generation).await {
                    warn!(key, error = %e, "cache_write_failed");
                }
            }
            Err(e) => warn!(key, error = %e, "cache_encode_failed"),
        }
    }

    async fn cached_dense(&self, key: &str) -> Option<Vec<Vec<u8>>> {
        match self.cache.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(dense) => Some(dense),
                Err(e) => {
                    warn!(key, error = %e, "cache_payload_invalid");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache_read_failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::cache::MemoryCache;
    use async_trait::async_trait;

    /// Cache stub whose every operation fails.
    struct BrokenCache;

    #[async_trait]
    impl SharedCache for BrokenCache {
        async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::cache("cache offline"))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> StoreResult<()> {
            Err(StoreError::cache("cache offline"))
        }
    }

    fn repository() -> (BoardRepository, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        let repo = BoardRepository::new(
            Arc::new(MemoryStore::new()),
            cache.clone(),
            CacheTtls::default(),
        );
        (repo, cache)
    }

    fn blinker() -> Vec<Vec<u8>> {
        vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
        ]
    }

    #[tokio::test]
    async fn test_create_and_fetch_round_trip() {
        let (repo, _) = repository();
        let dense = blinker();

        let board_id = repo.create_board(&dense).await.unwrap();
        let record = repo.get_board(&board_id).await.unwrap();

        assert_eq!(record.board_id, board_id);
        assert_eq!(record.to_board().unwrap().to_dense(), dense);
    }

    #[tokio::test]
    async fn test_board_ids_are_lowercase_uuids() {
        let (repo, _) = repository();
        let board_id = repo.create_board(&blinker()).await.unwrap();

        assert_eq!(board_id.len(), 36);
        assert!(board_id
            .chars()
            .all(|c| matches!(c, '0'..='9' | 'a'..='f' | '-')));
        assert_eq!(Uuid::parse_str(&board_id).unwrap().to_string(), board_id);
    }

    #[tokio::test]
    async fn test_unknown_board_is_not_found() {
        let (repo, _) = repository();

        let err = repo.get_board("does-not-exist").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_generation_zero_is_invalid() {
        let (repo, _) = repository();
        let board_id = repo.create_board(&blinker()).await.unwrap();

        let err = repo
            .get_state_at_generation(&board_id, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidGeneration { value: 0 }));
    }

    #[tokio::test]
    async fn test_next_generation_matches_engine_and_is_repeatable() {
        let (repo, _) = repository();
        let dense = blinker();
        let board_id = repo.create_board(&dense).await.unwrap();

        let expected = Board::from_dense(&dense).unwrap().next_generation().to_dense();
        let first = repo.get_next_generation(&board_id).await.unwrap();
        let second = repo.get_next_generation(&board_id).await.unwrap();

        assert_eq!(first, expected);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cached_generation_equals_recomputation() {
        let (repo, cache) = repository();
        let dense = blinker();
        let board_id = repo.create_board(&dense).await.unwrap();

        let computed = repo.get_state_at_generation(&board_id, 3).await.unwrap();

        // The result landed in the cache under its generation key.
        let cached = cache
            .get(&generation_key(&board_id, 3))
            .await
            .unwrap()
            .expect("generation should be cached");
        let cached: Vec<Vec<u8>> = serde_json::from_str(&cached).unwrap();
        assert_eq!(cached, computed);
    }

    #[tokio::test]
    async fn test_intermediate_generations_are_cached_at_stride() {
        let (repo, cache) = repository();
        let board_id = repo.create_board(&blinker()).await.unwrap();

        repo.get_state_at_generation(&board_id, 25).await.unwrap();

        for step in [10u64, 20] {
            assert!(
                cache
                    .get(&generation_key(&board_id, step))
                    .await
                    .unwrap()
                    .is_some(),
                "generation {step} should be cached"
            );
        }
        assert!(cache
            .get(&generation_key(&board_id, 15))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_durable_store() {
        let repo = BoardRepository::new(
            Arc::new(MemoryStore::new()),
            Arc::new(BrokenCache),
            CacheTtls::default(),
        );
        let dense = blinker();

        let board_id = repo.create_board(&dense).await.unwrap();
        let record = repo.get_board(&board_id).await.unwrap();
        assert_eq!(record.to_board().unwrap().to_dense(), dense);

        let expected = Board::from_dense(&dense).unwrap().next_generation().to_dense();
        assert_eq!(repo.get_next_generation(&board_id).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_cache_repopulates_after_read_through() {
        let (repo, cache) = repository();
        let board_id = repo.create_board(&blinker()).await.unwrap();

        // Simulate an evicted current-state entry.
        cache
            .set(&current_key(&board_id), "{}".into(), Duration::from_millis(0))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        repo.get_board(&board_id).await.unwrap();
        assert!(cache
            .get(&current_key(&board_id))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_invalid_seed_is_rejected_without_side_effects() {
        let (repo, cache) = repository();

        let err = repo.create_board(&[vec![0, 2]]).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidBoard(_)));
        assert!(cache.is_empty().await);
    }
}
