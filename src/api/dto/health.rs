//! DTOs for health check endpoint.

use serde::{Deserialize, Serialize};

use crate::infrastructure::cache::CacheStats;

/// Health check response with component status.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub caches: Vec<CacheReport>,
}

/// Individual component health status.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Counters of one entity cache.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheReport {
    pub name: String,
    pub enabled: bool,
    pub entries: usize,
    pub groups: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl From<CacheStats> for CacheReport {
    fn from(s: CacheStats) -> Self {
        CacheReport {
            name: s.name.to_string(),
            enabled: s.enabled,
            entries: s.entries,
            groups: s.groups,
            hits: s.hits,
            misses: s.misses,
            evictions: s.evictions,
        }
    }
}
