//! In-process entity caches.
//!
//! - [`IndexedCache`] - generic cache of one entity kind with id, natural-key
//!   and foreign-key-group access paths
//! - [`Caches`] - one cache per entity kind
//! - [`keys`] - the access paths each entity kind declares

mod caches;
mod indexed_cache;
pub mod keys;

pub use caches::Caches;
pub use indexed_cache::{
    CacheStats, Cacheable, GroupKey, ID_INDEX, IndexKey, IndexName, IndexedCache, ReadTicket,
};
