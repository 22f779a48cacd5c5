//! Mapping entity: a short code and the URL it resolves to.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted short code mapping.
///
/// `access_count` starts at 1 when the mapping is created and only ever grows
/// while the mapping exists. `updated_at` is refreshed by destination updates
/// and by every counted access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Mapping {
    pub code: String,
    pub destination: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mapping {
    /// Creates a freshly issued mapping with an access count of 1.
    pub fn issued(code: String, destination: String, now: DateTime<Utc>) -> Self {
        Self {
            code,
            destination,
            access_count: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input data for creating a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub code: String,
    pub destination: String,
}
