//! In-process mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreError};

/// Mapping repository backed by a concurrent hash map.
///
/// Each operation holds the shard lock for its key for the duration of the
/// mutation, which gives the same guarantees as the PostgreSQL store: a code
/// is inserted at most once and no increment is lost. Data lives only as long
/// as the process.
#[derive(Clone, Default)]
pub struct InMemoryMappingRepository {
    inner: Arc<DashMap<String, Mapping>>,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        debug!("Using in-memory mapping store");
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        match self.inner.entry(new_mapping.code) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                let mapping =
                    Mapping::issued(slot.key().clone(), new_mapping.destination, Utc::now());
                slot.insert(mapping.clone());
                Ok(mapping)
            }
        }
    }

    async fn get(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        Ok(self.inner.get(code).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.inner.contains_key(code))
    }

    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
    ) -> Result<Mapping, StoreError> {
        let mut entry = self.inner.get_mut(code).ok_or(StoreError::NotFound)?;
        entry.destination = destination.to_string();
        entry.updated_at = Utc::now();
        Ok(entry.value().clone())
    }

    async fn increment_access_count(&self, code: &str) -> Result<(), StoreError> {
        let mut entry = self.inner.get_mut(code).ok_or(StoreError::NotFound)?;
        entry.access_count += 1;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.inner
            .remove(code)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.len() as i64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_mapping(code: &str, destination: &str) -> NewMapping {
        NewMapping {
            code: code.to_string(),
            destination: destination.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryMappingRepository::new();

        let created = repo
            .create(new_mapping("abc123", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.access_count, 1);

        let fetched = repo.get("abc123").await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_code_conflicts() {
        let repo = InMemoryMappingRepository::new();
        repo.create(new_mapping("dup", "https://a.com"))
            .await
            .unwrap();

        let result = repo.create(new_mapping("dup", "https://b.com")).await;
        assert!(matches!(result, Err(StoreError::Conflict)));

        let kept = repo.get("dup").await.unwrap().unwrap();
        assert_eq!(kept.destination, "https://a.com");
    }

    #[tokio::test]
    async fn test_increment_and_update() {
        let repo = InMemoryMappingRepository::new();
        let created = repo
            .create(new_mapping("inc", "https://a.com"))
            .await
            .unwrap();

        repo.increment_access_count("inc").await.unwrap();
        repo.increment_access_count("inc").await.unwrap();
        let updated = repo
            .update_destination("inc", "https://b.com")
            .await
            .unwrap();

        assert_eq!(updated.access_count, 3);
        assert_eq!(updated.destination, "https://b.com");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_missing_code_reports_not_found() {
        let repo = InMemoryMappingRepository::new();

        assert!(repo.get("nope").await.unwrap().is_none());
        assert!(!repo.exists("nope").await.unwrap());
        assert!(matches!(
            repo.increment_access_count("nope").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            repo.update_destination("nope", "https://a.com").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(repo.delete("nope").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_deleted_code_can_be_reissued() {
        let repo = InMemoryMappingRepository::new();
        repo.create(new_mapping("reuse", "https://a.com"))
            .await
            .unwrap();
        repo.delete("reuse").await.unwrap();

        let again = repo
            .create(new_mapping("reuse", "https://b.com"))
            .await
            .unwrap();
        assert_eq!(again.destination, "https://b.com");
        assert_eq!(again.access_count, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
