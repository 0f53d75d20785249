//! Error types for the publikasi catalog.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using publikasi's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for catalog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced entity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parent category given on create/update does not exist
    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    /// Publication references a category that does not exist
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Uploading user is unknown to the user directory
    #[error("Uploader not found: {0}")]
    UploaderNotFound(Uuid),

    /// Publication has no cover image
    #[error("Publication {0} has no cover image")]
    NoCover(Uuid),

    /// Category name already taken
    #[error("Category with name '{0}' already exists")]
    DuplicateName(String),

    /// Release date year disagrees with the publication year
    #[error("Release date year {release_year} does not match publication year {year}")]
    YearMismatch { release_year: i32, year: i32 },

    /// Parent is itself a sub-category
    #[error("Category {0} is a sub-category and cannot have children")]
    DepthExceeded(Uuid),

    /// Category would become its own parent
    #[error("Category {0} cannot be its own parent")]
    SelfParent(Uuid),

    /// Category owns sub-categories
    #[error("Category {0} has sub-categories")]
    HasChildren(Uuid),

    /// Category is still referenced by publications
    #[error("Category {id} still has {count} publication(s)")]
    HasPublications { id: Uuid, count: i64 },

    /// Authenticated but not authorized
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Uploaded file carried no bytes
    #[error("File is required")]
    EmptyFile,

    /// Uploaded file is not a PDF
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Blob store has no bytes for the referenced file
    #[error("File missing from storage: {0}")]
    FileMissing(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable, transport-independent classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    DuplicateName,
    YearMismatch,
    DepthExceeded,
    SelfParent,
    HasChildren,
    HasPublications,
    Forbidden,
    EmptyFile,
    UnsupportedType,
    FileMissing,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::DuplicateName => "DUPLICATE_NAME",
            ErrorKind::YearMismatch => "YEAR_MISMATCH",
            ErrorKind::DepthExceeded => "DEPTH_EXCEEDED",
            ErrorKind::SelfParent => "SELF_PARENT",
            ErrorKind::HasChildren => "HAS_CHILDREN",
            ErrorKind::HasPublications => "HAS_PUBLICATIONS",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::EmptyFile => "EMPTY_FILE",
            ErrorKind::UnsupportedType => "UNSUPPORTED_TYPE",
            ErrorKind::FileMissing => "FILE_MISSING",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error for a structured (kind + message) response.
    ///
    /// The not-found family (`ParentNotFound`, `CategoryNotFound`,
    /// `UploaderNotFound`, `NoCover`) collapses into [`ErrorKind::NotFound`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_)
            | Error::ParentNotFound(_)
            | Error::CategoryNotFound(_)
            | Error::UploaderNotFound(_)
            | Error::NoCover(_) => ErrorKind::NotFound,
            Error::DuplicateName(_) => ErrorKind::DuplicateName,
            Error::YearMismatch { .. } => ErrorKind::YearMismatch,
            Error::DepthExceeded(_) => ErrorKind::DepthExceeded,
            Error::SelfParent(_) => ErrorKind::SelfParent,
            Error::HasChildren(_) => ErrorKind::HasChildren,
            Error::HasPublications { .. } => ErrorKind::HasPublications,
            Error::Forbidden(_) => ErrorKind::Forbidden,
            Error::EmptyFile => ErrorKind::EmptyFile,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::FileMissing(_) => ErrorKind::FileMissing,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Database(_)
            | Error::Serialization(_)
            | Error::Config(_)
            | Error::Internal(_)
            | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// True for validation, authorization and not-found failures the caller
    /// can correct; false for infrastructure faults.
    pub fn is_client_error(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
