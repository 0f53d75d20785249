//! Structured logging schema and field name constants for publikasi.
//!
//! All crates use these field names so log aggregation can query every
//! subsystem the same way.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, best-effort side effect skipped |
//! | INFO  | Lifecycle events, completed mutations |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "catalog", "database", "storage", "jobs"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "categories", "publications", "fanout", "history", "retention"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create", "download", "notify_new_publication", "purge"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Category UUID being operated on.
pub const CATEGORY_ID: &str = "category_id";

/// Publication UUID being operated on.
pub const PUBLICATION_ID: &str = "publication_id";

/// Notification UUID being operated on.
pub const NOTIFICATION_ID: &str = "notification_id";

/// Acting or affected user UUID.
pub const USER_ID: &str = "user_id";

/// Blob reference in the file store.
pub const FILE_REF: &str = "file_ref";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of notifications written by a fan-out.
pub const RECIPIENT_COUNT: &str = "recipient_count";

/// Milestone threshold crossed by a download.
pub const THRESHOLD: &str = "threshold";

/// Rows removed by a bulk delete.
pub const DELETED_COUNT: &str = "deleted_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
