//! Utility functions for code generation, URL processing, and error classification.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Destination URL validation and normalization
//! - [`db_error`] - Classification of database errors

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
