//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreError};
use crate::utils::db_error::{is_pool_timeout, is_unique_violation_on_code};

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on_code(&e) {
            return StoreError::Conflict;
        }
        if is_pool_timeout(&e) {
            return StoreError::Timeout {
                operation: "acquire_connection",
            };
        }
        StoreError::Backend(e.to_string())
    }
}

/// PostgreSQL repository for short code mappings.
///
/// Uniqueness comes from the primary key on `code`; the access counter is
/// bumped with a single `UPDATE ... SET access_count = access_count + 1`.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        let mapping = sqlx::query_as::<_, Mapping>(
            r#"
            INSERT INTO mappings (code, destination, access_count)
            VALUES ($1, $2, 1)
            RETURNING code, destination, access_count, created_at, updated_at
            "#,
        )
        .bind(&new_mapping.code)
        .bind(&new_mapping.destination)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(mapping)
    }

    async fn get(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        let mapping = sqlx::query_as::<_, Mapping>(
            r#"
            SELECT code, destination, access_count, created_at, updated_at
            FROM mappings
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(mapping)
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM mappings WHERE code = $1)",
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
    ) -> Result<Mapping, StoreError> {
        sqlx::query_as::<_, Mapping>(
            r#"
            UPDATE mappings
            SET destination = $2, updated_at = now()
            WHERE code = $1
            RETURNING code, destination, access_count, created_at, updated_at
            "#,
        )
        .bind(code)
        .bind(destination)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn increment_access_count(&self, code: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE mappings
            SET access_count = access_count + 1, updated_at = now()
            WHERE code = $1
            "#,
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM mappings WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
