#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use shortcode_service::api;
use shortcode_service::api::handlers::{health_handler, redirect_handler};
use shortcode_service::application::services::{
    DynMappingService, MappingService, MappingServiceOptions, SharedCodeGenerator,
};
use shortcode_service::domain::entities::{Mapping, NewMapping};
use shortcode_service::domain::repositories::{MappingRepository, StoreError};
use shortcode_service::infrastructure::persistence::{
    InMemoryMappingRepository, PgMappingRepository,
};
use shortcode_service::state::AppState;
use shortcode_service::utils::code_generator::{
    CodeGenerator, GenerationError, RandomCodeGenerator,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const BASE_URL: &str = "https://s.example.com";

/// State over a fresh in-memory store with `BASE_URL` configured.
pub fn create_test_state() -> AppState {
    state_for(Arc::new(InMemoryMappingRepository::new()))
}

/// State over the PostgreSQL store behind `pool`.
pub fn create_pg_state(pool: PgPool) -> AppState {
    state_for(Arc::new(PgMappingRepository::new(Arc::new(pool))))
}

pub fn state_for(repository: Arc<dyn MappingRepository>) -> AppState {
    state_with_generator(repository, Arc::new(RandomCodeGenerator::new()))
}

/// State whose service issues codes from `generator`.
pub fn state_with_generator(
    repository: Arc<dyn MappingRepository>,
    generator: SharedCodeGenerator,
) -> AppState {
    let options = MappingServiceOptions {
        read_timeout: Duration::from_secs(1),
        write_timeout: Duration::from_secs(1),
        increment_timeout: Duration::from_millis(500),
        read_retries: 0,
        ..MappingServiceOptions::default()
    };
    let service: Arc<DynMappingService> =
        Arc::new(MappingService::with_generator(repository, generator, options));

    AppState::new(service, Some(BASE_URL.to_string()))
}

/// Generator that hands out `codes` in order, then falls back to random codes.
pub struct ScriptedGenerator {
    codes: Vec<String>,
    next: AtomicUsize,
    fallback: RandomCodeGenerator,
}

impl ScriptedGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            next: AtomicUsize::new(0),
            fallback: RandomCodeGenerator::new(),
        }
    }
}

impl CodeGenerator for ScriptedGenerator {
    fn generate(&self, length: usize) -> Result<String, GenerationError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        match self.codes.get(n) {
            Some(code) => Ok(code.clone()),
            None => self.fallback.generate(length),
        }
    }
}

/// All application routes without the outer middleware stack.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .merge(api::routes::routes())
        .with_state(state)
}

pub async fn insert_mapping(pool: &PgPool, code: &str, destination: &str, access_count: i64) {
    sqlx::query("INSERT INTO mappings (code, destination, access_count) VALUES ($1, $2, $3)")
        .bind(code)
        .bind(destination)
        .bind(access_count)
        .execute(pool)
        .await
        .unwrap();
}

/// Store whose every call fails as if the backend were unreachable.
pub struct UnavailableStore;

#[async_trait]
impl MappingRepository for UnavailableStore {
    async fn create(&self, _new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn get(&self, _code: &str) -> Result<Option<Mapping>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn exists(&self, _code: &str) -> Result<bool, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn update_destination(
        &self,
        _code: &str,
        _destination: &str,
    ) -> Result<Mapping, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn increment_access_count(&self, _code: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn delete(&self, _code: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}
