//! Response DTOs describing a stored mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Mapping;

/// Mapping as returned by create and update.
#[derive(Debug, Serialize)]
pub struct MappingResponse {
    pub code: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MappingResponse {
    pub fn new(mapping: Mapping, short_url: Option<String>) -> Self {
        Self {
            code: mapping.code,
            destination: mapping.destination,
            short_url,
            created_at: mapping.created_at,
            updated_at: mapping.updated_at,
        }
    }
}

/// Full mapping including its access count, returned by retrieve and stats.
#[derive(Debug, Serialize)]
pub struct MappingStatsResponse {
    pub code: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MappingStatsResponse {
    pub fn new(mapping: Mapping, short_url: Option<String>) -> Self {
        Self {
            code: mapping.code,
            destination: mapping.destination,
            short_url,
            access_count: mapping.access_count,
            created_at: mapping.created_at,
            updated_at: mapping.updated_at,
        }
    }
}
