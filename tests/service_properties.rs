use shortcode_service::application::services::{
    DynMappingService, MappingService, MappingServiceOptions,
};
use shortcode_service::domain::entities::NewMapping;
use shortcode_service::domain::repositories::MappingRepository;
use shortcode_service::error::AppError;
use shortcode_service::infrastructure::persistence::InMemoryMappingRepository;
use shortcode_service::utils::code_generator::{CodeGenerator, GenerationError};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::task::JoinSet;

/// Hands out `pool[n % pool.len()]` for the n-th call.
struct CyclingGenerator {
    pool: Vec<String>,
    next: AtomicUsize,
}

impl CodeGenerator for CyclingGenerator {
    fn generate(&self, _length: usize) -> Result<String, GenerationError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(self.pool[n % self.pool.len()].clone())
    }
}

fn memory_service() -> (Arc<DynMappingService>, Arc<dyn MappingRepository>) {
    let repository: Arc<dyn MappingRepository> = Arc::new(InMemoryMappingRepository::new());
    let service = Arc::new(MappingService::new(repository.clone()));
    (service, repository)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_issue_distinct_codes() {
    const N: usize = 200;
    let (service, repository) = memory_service();

    let mut tasks = JoinSet::new();
    for i in 0..N {
        let service = service.clone();
        tasks.spawn(async move { service.create(&format!("https://example.com/{i}")).await });
    }

    let mut codes = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        let mapping = result.unwrap().unwrap();
        assert_eq!(mapping.access_count, 1);
        codes.insert(mapping.code);
    }

    assert_eq!(codes.len(), N);
    assert_eq!(repository.count().await.unwrap(), N as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_survive_collisions() {
    const N: usize = 20;
    let repository: Arc<dyn MappingRepository> = Arc::new(InMemoryMappingRepository::new());

    let pool: Vec<String> = (0..2 * N).map(|i| format!("code{i:02}")).collect();
    for taken in pool.iter().step_by(2) {
        repository
            .create(NewMapping {
                code: taken.clone(),
                destination: "https://taken.example.com".to_string(),
            })
            .await
            .unwrap();
    }

    let generator = CyclingGenerator {
        pool,
        next: AtomicUsize::new(0),
    };
    let options = MappingServiceOptions {
        max_create_attempts: 50,
        ..MappingServiceOptions::default()
    };
    let service = Arc::new(MappingService::with_generator(
        repository.clone(),
        generator,
        options,
    ));

    let mut tasks = JoinSet::new();
    for i in 0..N {
        let service = service.clone();
        tasks.spawn(async move { service.create(&format!("https://example.com/{i}")).await });
    }

    let mut codes = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        let mapping = result.unwrap().unwrap();
        assert_ne!(mapping.destination, "https://taken.example.com");
        codes.insert(mapping.code);
    }

    assert_eq!(codes.len(), N);
    assert_eq!(repository.count().await.unwrap(), 2 * N as i64);
}

#[tokio::test]
async fn test_exhausted_code_space_is_internal() {
    let repository: Arc<dyn MappingRepository> = Arc::new(InMemoryMappingRepository::new());
    repository
        .create(NewMapping {
            code: "only1".to_string(),
            destination: "https://example.com".to_string(),
        })
        .await
        .unwrap();

    let generator = CyclingGenerator {
        pool: vec!["only1".to_string()],
        next: AtomicUsize::new(0),
    };
    let service = MappingService::with_generator(
        repository.clone(),
        generator,
        MappingServiceOptions::default(),
    );

    let result = service.create("https://other.example.com").await;

    assert!(matches!(result, Err(AppError::Internal { .. })));
    assert_eq!(repository.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_are_all_counted() {
    const K: i64 = 250;
    let (service, _) = memory_service();
    let mapping = service.create("example.com").await.unwrap();

    let mut tasks = JoinSet::new();
    for _ in 0..K {
        let service = service.clone();
        let code = mapping.code.clone();
        tasks.spawn(async move { service.resolve(&code).await });
    }

    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap(), "https://example.com");
    }

    let stats = service.stats(&mapping.code).await.unwrap();
    assert_eq!(stats.access_count, 1 + K);
}

#[tokio::test]
async fn test_round_trip_returns_normalized_destination() {
    let (service, _) = memory_service();

    for input in [
        "example.com",
        "  https://example.com/a?b=c  ",
        "http://localhost:8080/x",
    ] {
        let mapping = service.create(input).await.unwrap();
        let expected = shortcode_service::utils::url_normalizer::normalize_url(input).unwrap();
        assert_eq!(service.resolve(&mapping.code).await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_absent_code_is_not_found_everywhere() {
    let (service, _) = memory_service();

    assert!(matches!(
        service.resolve("absent").await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        service.retrieve("absent").await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        service.stats("absent").await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        service.update("absent", "https://example.com").await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete("absent").await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_is_not_repeatable() {
    let (service, repository) = memory_service();
    let mapping = service.create("https://example.com").await.unwrap();

    service.delete(&mapping.code).await.unwrap();

    assert!(matches!(
        service.delete(&mapping.code).await,
        Err(AppError::NotFound { .. })
    ));
    assert_eq!(repository.count().await.unwrap(), 0);
}
