//! Per-kind cache bundle.

use super::indexed_cache::{CacheStats, Cacheable, IndexedCache};
use crate::domain::entities::{Car, Customer, ServiceCenter, ServiceRequest};
use tracing::info;

/// One [`IndexedCache`] per entity kind.
///
/// Built once at startup and shared by every service through an `Arc`.
pub struct Caches {
    pub customers: IndexedCache<Customer>,
    pub cars: IndexedCache<Car>,
    pub service_centers: IndexedCache<ServiceCenter>,
    pub service_requests: IndexedCache<ServiceRequest>,
}

impl Caches {
    /// Creates empty caches, or disabled ones when `enabled` is false.
    pub fn new(enabled: bool) -> Self {
        Self {
            customers: build(enabled, "customers"),
            cars: build(enabled, "cars"),
            service_centers: build(enabled, "service_centers"),
            service_requests: build(enabled, "service_requests"),
        }
    }

    /// Statistics of every cache, in a stable order.
    pub fn stats(&self) -> Vec<CacheStats> {
        vec![
            self.customers.stats(),
            self.cars.stats(),
            self.service_centers.stats(),
            self.service_requests.stats(),
        ]
    }

    /// Drops every cached entry of every kind.
    pub fn clear_all(&self) {
        self.customers.clear();
        self.cars.clear();
        self.service_centers.clear();
        self.service_requests.clear();
    }

    /// Clears everything and logs final counters.
    pub fn shutdown(&self) {
        for stats in self.stats() {
            info!(
                "Cache {}: {} entries, {} hits, {} misses, {} evictions",
                stats.name, stats.entries, stats.hits, stats.misses, stats.evictions
            );
        }
        self.clear_all();
    }
}

fn build<T: Cacheable>(enabled: bool, name: &'static str) -> IndexedCache<T> {
    if enabled {
        IndexedCache::new(name)
    } else {
        IndexedCache::disabled(name)
    }
}
