//! Board repository for the lifegrid evolution service.
//!
//! Three tiers sit behind one repository type:
//!
//! 1. an optional in-process [`LruTier`],
//! 2. a [`SharedCache`] holding serialised board state under
//!    `board:{id}:current` and `board:{id}:generation:{G}` keys,
//! 3. a [`DurableStore`] of write-once [`BoardRecord`]s.
//!
//! The durable store is authoritative; both cache tiers are advisory and
//! every cached answer must equal a fresh recomputation from the seed.

mod backend;
mod cache;
mod error;
mod record;
mod repository;

pub use backend::{DurableStore, JsonFileStore, MemoryStore};
pub use cache::{LruTier, MemoryCache, SharedCache};
pub use error::{StoreError, StoreResult};
pub use record::{cells_to_pairs, pairs_to_cells, BoardRecord};
pub use repository::{current_key, final_key, generation_key, BoardRepository, CacheTtls};
