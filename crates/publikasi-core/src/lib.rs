//! # publikasi-core
//!
//! Core types, traits, and abstractions for the publikasi statistical
//! publication catalog.
//!
//! This crate provides the domain models, the error taxonomy, the repository
//! and collaborator traits, and the pure pieces of catalog logic (milestone
//! detection, upload validation) that the other crates build on.

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod logging;
pub mod milestone;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorKind, Result};
pub use file_safety::{sanitize_filename, validate_publication_upload, COVER_MIME, PDF_MIME};
pub use models::*;
pub use traits::*;
