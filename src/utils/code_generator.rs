//! Short code generation and validation utilities.
//!
//! Codes are drawn from the 62-character alphanumeric alphabet using the
//! operating system CSPRNG. If the entropy source fails, generation fails;
//! there is no deterministic fallback.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Characters a generated code is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default generated code length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest code accepted anywhere in the system.
pub const MIN_CODE_LENGTH: usize = 3;

/// Longest code accepted anywhere in the system.
pub const MAX_CODE_LENGTH: usize = 20;

/// Codes that would be shadowed by static routes and are never issued.
pub const RESERVED_CODES: &[&str] = &["health", "shorten"];

/// Largest multiple of 62 that fits in a byte. Bytes at or above it are
/// discarded so every character is equally likely.
const REJECTION_THRESHOLD: u8 = (256 - 256 % ALPHABET.len()) as u8;

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{3,20}$").expect("code regex is valid"));

/// Errors produced while generating a code.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Random source failure: {0}")]
    RandomSource(String),

    #[error("Code length must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}, got {0}")]
    InvalidLength(usize),
}

/// A source of uniformly random bytes.
pub trait EntropySource: Send + Sync {
    /// Fills `buf` entirely with random bytes or fails.
    fn fill(&self, buf: &mut [u8]) -> Result<(), GenerationError>;
}

/// Operating system CSPRNG backed by `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GenerationError> {
        getrandom::fill(buf).map_err(|e| GenerationError::RandomSource(e.to_string()))
    }
}

/// Produces candidate short codes.
///
/// Implementations are pure generators and never touch storage; uniqueness is
/// enforced by the mapping store.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Generates a code of exactly `length` characters.
    fn generate(&self, length: usize) -> Result<String, GenerationError>;
}

impl<G: CodeGenerator + ?Sized> CodeGenerator for std::sync::Arc<G> {
    fn generate(&self, length: usize) -> Result<String, GenerationError> {
        (**self).generate(length)
    }
}

/// Uniform random generator over [`ALPHABET`].
#[derive(Debug, Clone, Default)]
pub struct RandomCodeGenerator<E = OsEntropy> {
    entropy: E,
}

impl RandomCodeGenerator<OsEntropy> {
    /// Creates a generator backed by the OS random source.
    pub fn new() -> Self {
        Self { entropy: OsEntropy }
    }
}

impl<E: EntropySource> RandomCodeGenerator<E> {
    /// Creates a generator reading from a custom entropy source.
    pub fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }
}

impl<E: EntropySource> CodeGenerator for RandomCodeGenerator<E> {
    fn generate(&self, length: usize) -> Result<String, GenerationError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(GenerationError::InvalidLength(length));
        }

        let mut code = String::with_capacity(length);
        // Acceptance rate is 248/256, so one extra pass is almost always enough.
        let mut buffer = vec![0u8; length + length / 2 + 1];

        while code.len() < length {
            self.entropy.fill(&mut buffer)?;

            for &byte in &buffer {
                if byte >= REJECTION_THRESHOLD {
                    continue;
                }
                code.push(ALPHABET[(byte as usize) % ALPHABET.len()] as char);
                if code.len() == length {
                    break;
                }
            }
        }

        Ok(code)
    }
}

/// Generates a code of `length` characters from the OS random source.
pub fn generate_code(length: usize) -> Result<String, GenerationError> {
    RandomCodeGenerator::new().generate(length)
}

/// Returns `true` if `code` is 3-20 characters from `[A-Za-z0-9]`.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Returns `true` if `code` is routed to a system endpoint instead of a redirect.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates the format of a code supplied by a caller.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if the code is not 3-20 alphanumeric characters.
pub fn validate_code(code: &str) -> Result<(), AppError> {
    if is_valid_code(code) {
        return Ok(());
    }

    Err(AppError::bad_request(
        "Short code must be 3-20 alphanumeric characters",
        json!({ "code": code }),
    ))
}
