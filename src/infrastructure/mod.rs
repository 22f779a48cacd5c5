//! Infrastructure layer implementing the storage contracts defined by the domain layer.
//!
//! - [`persistence`] - PostgreSQL and in-memory mapping stores

pub mod persistence;
