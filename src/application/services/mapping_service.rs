//! Short code issuance and resolution service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::{
    CodeGenerator, DEFAULT_CODE_LENGTH, RandomCodeGenerator, is_reserved_code, validate_code,
};
use crate::utils::url_normalizer::normalize_url;

/// Tunables for [`MappingService`].
#[derive(Debug, Clone)]
pub struct MappingServiceOptions {
    /// Length of generated codes.
    pub code_length: usize,
    /// Maximum number of codes tried per create before giving up.
    pub max_create_attempts: usize,
    /// Budget for a single read against the store.
    pub read_timeout: Duration,
    /// Budget for a single mutation against the store.
    pub write_timeout: Duration,
    /// Budget for the access-count bump performed during resolution.
    pub increment_timeout: Duration,
    /// Extra attempts for reads that failed transiently.
    pub read_retries: usize,
}

impl Default for MappingServiceOptions {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_create_attempts: 10,
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            increment_timeout: Duration::from_secs(1),
            read_retries: 2,
        }
    }
}

/// Code generator shared behind a trait object.
pub type SharedCodeGenerator = Arc<dyn CodeGenerator>;

/// Service type stored in application state.
pub type DynMappingService = MappingService<dyn MappingRepository, SharedCodeGenerator>;

/// Runs `fut` under `budget`, reporting expiry as [`StoreError::Timeout`].
///
/// The store future is dropped on expiry. Store mutations are single atomic
/// statements, so nothing is left half-written.
async fn with_deadline<T, F>(
    operation: &'static str,
    budget: Duration,
    fut: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(budget, fut)
        .await
        .map_err(|_| StoreError::Timeout { operation })?
}

fn code_not_found(code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "code": code }))
}

/// Translates a raw store failure into exactly one [`AppError`] kind.
fn translate_store_error(operation: &'static str, code: &str, e: StoreError) -> AppError {
    match e {
        StoreError::NotFound => code_not_found(code),
        StoreError::Conflict => AppError::conflict(
            "Short code already exists",
            json!({ "code": code, "operation": operation }),
        ),
        StoreError::Timeout { operation } => AppError::internal(
            "Storage operation timed out",
            json!({ "code": code, "operation": operation }),
        ),
        StoreError::Backend(reason) => AppError::internal(
            "Storage failure",
            json!({ "code": code, "operation": operation, "reason": reason }),
        ),
    }
}

fn invalid_url(e: impl std::fmt::Display) -> AppError {
    AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
}

/// Service for issuing, resolving and managing short code mappings.
///
/// Holds no mutable state of its own: uniqueness of codes and the access
/// counter are delegated to the store's atomic primitives, so any number of
/// requests may call into the same service concurrently.
pub struct MappingService<R: MappingRepository + ?Sized, G: CodeGenerator = SharedCodeGenerator> {
    repository: Arc<R>,
    generator: G,
    options: MappingServiceOptions,
}

impl<R: MappingRepository + ?Sized> MappingService<R, SharedCodeGenerator> {
    /// Creates a service using the OS random code generator and default options.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_options(repository, MappingServiceOptions::default())
    }

    /// Creates a service using the OS random code generator and the given options.
    pub fn with_options(repository: Arc<R>, options: MappingServiceOptions) -> Self {
        Self::with_generator(repository, Arc::new(RandomCodeGenerator::new()), options)
    }
}

impl<R: MappingRepository + ?Sized, G: CodeGenerator> MappingService<R, G> {
    /// Creates a service with an explicit generator and options.
    pub fn with_generator(repository: Arc<R>, generator: G, options: MappingServiceOptions) -> Self {
        Self {
            repository,
            generator,
            options,
        }
    }

    pub fn options(&self) -> &MappingServiceOptions {
        &self.options
    }

    /// Issues a new short code for `destination`.
    ///
    /// The destination is trimmed and defaulted to `https://` when it has no
    /// scheme. A fresh code is generated for every attempt; when the store
    /// reports the code as taken, or the code is reserved for a static route,
    /// another one is tried, up to
    /// `max_create_attempts` times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the URL is malformed.
    /// Returns [`AppError::Internal`] if the generator fails, the store fails,
    /// or every attempt collided.
    pub async fn create(&self, destination: &str) -> Result<Mapping, AppError> {
        let destination = normalize_url(destination).map_err(invalid_url)?;
        let max_attempts = self.options.max_create_attempts;

        for attempt in 1..=max_attempts {
            let code = self
                .generator
                .generate(self.options.code_length)
                .map_err(|e| {
                    error!(error = %e, "Short code generation failed");
                    AppError::internal(
                        "Failed to generate short code",
                        json!({ "reason": e.to_string() }),
                    )
                })?;

            if is_reserved_code(&code) {
                counter!("mapping_code_collisions_total").increment(1);
                warn!(code = %code, attempt, max_attempts, "Generated code is reserved, retrying");
                continue;
            }

            let new_mapping = NewMapping {
                code: code.clone(),
                destination: destination.clone(),
            };

            match with_deadline(
                "create",
                self.options.write_timeout,
                self.repository.create(new_mapping),
            )
            .await
            {
                Ok(mapping) => {
                    counter!("mappings_created_total").increment(1);
                    info!(code = %mapping.code, attempt, "Mapping created");
                    return Ok(mapping);
                }
                Err(StoreError::Conflict) => {
                    counter!("mapping_code_collisions_total").increment(1);
                    warn!(code = %code, attempt, max_attempts, "Generated code collided, retrying");
                }
                Err(e) => return Err(translate_store_error("create", &code, e)),
            }
        }

        error!(max_attempts, "Exhausted short code attempts");
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": max_attempts }),
        ))
    }

    /// Resolves `code` to its destination and counts the access.
    ///
    /// The count is bumped within `increment_timeout`. If that fails or runs
    /// out of time the destination is still returned; the failure is logged
    /// and counted in `mapping_access_increment_failures_total`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for a malformed code.
    /// Returns [`AppError::NotFound`] if the code is not live.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        validate_code(code)?;

        let mapping = self.find(code).await?;
        self.record_access(code).await;

        Ok(mapping.destination)
    }

    /// Returns the full mapping without touching its access count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for a malformed code.
    /// Returns [`AppError::NotFound`] if the code is not live.
    pub async fn retrieve(&self, code: &str) -> Result<Mapping, AppError> {
        validate_code(code)?;
        self.find(code).await
    }

    /// Returns code, destination, access count and timestamps for `code`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::retrieve`].
    pub async fn stats(&self, code: &str) -> Result<Mapping, AppError> {
        self.retrieve(code).await
    }

    /// Points `code` at a new destination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for a malformed code or URL.
    /// Returns [`AppError::NotFound`] if the code is not live.
    pub async fn update(&self, code: &str, destination: &str) -> Result<Mapping, AppError> {
        validate_code(code)?;
        let destination = normalize_url(destination).map_err(invalid_url)?;

        let mapping = with_deadline(
            "update_destination",
            self.options.write_timeout,
            self.repository.update_destination(code, &destination),
        )
        .await
        .map_err(|e| translate_store_error("update_destination", code, e))?;

        info!(code, "Mapping destination updated");
        Ok(mapping)
    }

    /// Permanently removes `code`.
    ///
    /// A second delete of the same code, including one racing the first,
    /// reports [`AppError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for a malformed code.
    /// Returns [`AppError::NotFound`] if the code is not live.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        validate_code(code)?;

        let exists = self
            .read("exists", || self.repository.exists(code))
            .await
            .map_err(|e| translate_store_error("exists", code, e))?;
        if !exists {
            return Err(code_not_found(code));
        }

        with_deadline(
            "delete",
            self.options.write_timeout,
            self.repository.delete(code),
        )
        .await
        .map_err(|e| translate_store_error("delete", code, e))?;

        info!(code, "Mapping deleted");
        Ok(())
    }

    /// Number of live mappings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failure.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.read("count", || self.repository.count())
            .await
            .map_err(|e| translate_store_error("count", "", e))
    }

    /// Checks that the store is reachable within the read budget.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    pub async fn health(&self) -> Result<(), AppError> {
        with_deadline("ping", self.options.read_timeout, self.repository.ping())
            .await
            .map_err(|e| translate_store_error("ping", "", e))
    }

    async fn find(&self, code: &str) -> Result<Mapping, AppError> {
        self.read("get", || self.repository.get(code))
            .await
            .map_err(|e| translate_store_error("get", code, e))?
            .ok_or_else(|| code_not_found(code))
    }

    /// Runs an idempotent read under the read budget, retrying transient failures.
    async fn read<T, A, F>(&self, operation: &'static str, mut action: A) -> Result<T, StoreError>
    where
        A: FnMut() -> F,
        F: Future<Output = Result<T, StoreError>>,
    {
        let strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_millis(250))
            .map(jitter)
            .take(self.options.read_retries);

        RetryIf::start(
            strategy,
            || {
                let fut = action();
                async move {
                    let result = with_deadline(operation, self.options.read_timeout, fut).await;
                    if let Err(e) = &result
                        && e.is_transient()
                    {
                        debug!(operation, error = %e, "Transient read failure");
                    }
                    result
                }
            },
            |e: &StoreError| e.is_transient(),
        )
        .await
    }

    async fn record_access(&self, code: &str) {
        let result = with_deadline(
            "increment_access_count",
            self.options.increment_timeout,
            self.repository.increment_access_count(code),
        )
        .await;

        if let Err(e) = result {
            counter!("mapping_access_increment_failures_total").increment(1);
            error!(code, error = %e, "Failed to record access, redirect continues");
        }
    }
}
