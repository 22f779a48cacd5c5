//! Core domain entities.
//!
//! - [`Mapping`] - A short code and its destination, access counter and timestamps
//! - [`NewMapping`] - Input for creating a mapping

pub mod mapping;

pub use mapping::{Mapping, NewMapping};
