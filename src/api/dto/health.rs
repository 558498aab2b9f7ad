//! Health check DTOs for API responses.

use jiff::Timestamp;
use serde::Serialize;

use crate::cache::{CacheStats, ConnectionState};

/// Health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// The cache is unreachable; requests still succeed without it
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub backend: &'static str,
    pub state: ConnectionState,
    pub stats: CacheStats,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub timestamp: Timestamp,
    pub cache: CacheHealth,
}
