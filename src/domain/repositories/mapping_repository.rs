//! Repository trait for short code mappings.

use crate::domain::entities::{Mapping, NewMapping};
use async_trait::async_trait;

/// Raw failures reported by a mapping store.
///
/// These never reach HTTP handlers directly; the service layer translates
/// each one into an [`crate::error::AppError`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Mapping not found")]
    NotFound,

    #[error("Code already exists")]
    Conflict,

    #[error("Store operation `{operation}` timed out")]
    Timeout { operation: &'static str },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether retrying an idempotent read could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout { .. } | StoreError::Backend(_))
    }
}

/// Durable key space of short code mappings.
///
/// Uniqueness of `code` and atomicity of the access counter are enforced here,
/// not by callers. Every mutating method is a single atomic operation, so a
/// caller abandoning the future can never observe a half-written record.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping with `access_count = 1`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a live mapping already uses the code.
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError>;

    /// Finds a mapping by code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Mapping))` if found
    /// - `Ok(None)` if not found
    async fn get(&self, code: &str) -> Result<Option<Mapping>, StoreError>;

    /// Checks whether a code is currently live.
    ///
    /// Advisory only: [`Self::create`] enforces uniqueness on its own.
    async fn exists(&self, code: &str) -> Result<bool, StoreError>;

    /// Replaces the destination and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no mapping uses the code.
    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
    ) -> Result<Mapping, StoreError>;

    /// Atomically adds one to `access_count` and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no mapping uses the code.
    async fn increment_access_count(&self, code: &str) -> Result<(), StoreError>;

    /// Permanently removes a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no mapping uses the code.
    async fn delete(&self, code: &str) -> Result<(), StoreError>;

    /// Counts live mappings.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Verifies the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
