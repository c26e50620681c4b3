//! Repository trait definitions for property storage.
//!
//! The analytics core never talks to storage directly; it consumes a
//! [`PropertyRepository`] that can answer filtered and date-bounded queries.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`property`]: CRUD and query operations on property listings

pub mod error;
pub mod property;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use property::PropertyRepository;
