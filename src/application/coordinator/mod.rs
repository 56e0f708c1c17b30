//! Single choke point for every store mutation and every cache fill.
//!
//! Each mutating operation runs in the same order:
//!
//! 1. validate input and check referenced ids and natural keys against the
//!    store (never against the cache, which may be incomplete)
//! 2. take a [`ReadTicket`](crate::infrastructure::cache::ReadTicket) on the
//!    affected cache
//! 3. write to the store
//! 4. put the committed value into the cache, or evict it if a concurrent
//!    writer touched the same id after the ticket was taken
//!
//! A failure in steps 1 or 3 returns before the cache is touched, except
//! that an unexpected store error evicts the affected entries since the
//! outcome of the write is unknown.

mod cars;
mod customers;
mod service_centers;
mod service_requests;

use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use crate::application::graph::{RelationshipGraph, commit};
use crate::domain::relationships::CascadeDeletion;
use crate::domain::repositories::EntityStore;
use crate::error::AppError;
use crate::infrastructure::cache::{Cacheable, Caches, ID_INDEX, IndexedCache, ReadTicket};

/// Orchestrates store writes, cache updates and relationship fix-ups.
pub struct ConsistencyCoordinator {
    graph: RelationshipGraph,
}

impl ConsistencyCoordinator {
    pub fn new(store: EntityStore, caches: Arc<Caches>) -> Self {
        Self {
            graph: RelationshipGraph::new(store, caches),
        }
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    fn store(&self) -> &EntityStore {
        self.graph.store()
    }

    fn caches(&self) -> &Caches {
        self.graph.caches()
    }

    /// Executes a cascade plan in one store transaction, then evicts its
    /// entities children first.
    ///
    /// Returns what the store removed. Entities that were only planned are
    /// evicted as well.
    async fn execute_deletion(&self, plan: CascadeDeletion) -> Result<CascadeDeletion, AppError> {
        match self.store().unit_of_work.delete_cascade(&plan).await {
            Ok(done) => {
                if done != plan {
                    self.graph.apply_deletion(&plan);
                }
                self.graph.apply_deletion(&done);
                Ok(done)
            }
            Err(e @ AppError::Conflict { .. }) => Err(e),
            Err(e) => {
                warn!(
                    "Delete of {} #{} failed ({}), evicting its cascade set",
                    plan.root.kind(),
                    plan.root.id(),
                    e
                );
                self.graph.apply_deletion(&plan);
                Err(e)
            }
        }
    }
}

/// Read-through lookup of one entity by access path.
///
/// The ticket is taken before `load` is polled, so a value read from the
/// store is dropped if the entity was written or evicted meanwhile.
async fn read_through<T, F>(
    cache: &IndexedCache<T>,
    index: &str,
    key: &str,
    load: F,
) -> Result<Option<T>, AppError>
where
    T: Cacheable,
    F: Future<Output = Result<Option<T>, AppError>>,
{
    if let Some(hit) = cache.get(index, key) {
        return Ok(Some(hit));
    }

    let ticket = cache.begin();
    let loaded = load.await?;
    if let Some(value) = &loaded {
        cache.put_fresh(ticket, value.clone());
    }
    Ok(loaded)
}

/// Read-through lookup by primary key that fails with NotFound.
async fn find_or_not_found<T, F>(
    cache: &IndexedCache<T>,
    label: &str,
    id: i64,
    load: F,
) -> Result<T, AppError>
where
    T: Cacheable,
    F: Future<Output = Result<Option<T>, AppError>>,
{
    read_through(cache, ID_INDEX, &id.to_string(), load)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{label} not found"), json!({ "id": id })))
}

/// Runs a store write and records its result in `cache`.
///
/// On an unexpected store error the entry for `id` is evicted.
async fn write_through<T, F>(
    cache: &IndexedCache<T>,
    id: Option<i64>,
    write: F,
) -> Result<T, AppError>
where
    T: Cacheable,
    F: Future<Output = Result<T, AppError>>,
{
    let ticket = cache.begin();
    match write.await {
        Ok(value) => {
            commit(cache, ticket, &value);
            Ok(value)
        }
        Err(e) => {
            if let (AppError::Internal { .. }, Some(id)) = (&e, id) {
                cache.evict_id(id);
            }
            Err(e)
        }
    }
}

/// Fills the cache from a full table read.
fn warm<T: Cacheable>(cache: &IndexedCache<T>, ticket: ReadTicket, all: &[T]) {
    for value in all {
        cache.put_fresh(ticket, value.clone());
    }
}

/// Fails with Conflict when `holder` is an entity other than `own_id`.
fn ensure_unique<T: Cacheable>(
    holder: Option<T>,
    own_id: Option<i64>,
    field: &'static str,
    value: &str,
    message: &str,
) -> Result<(), AppError> {
    match holder {
        Some(other) if Some(other.id()) != own_id => Err(AppError::conflict(
            message,
            json!({ "field": field, "value": value }),
        )),
        _ => Ok(()),
    }
}
