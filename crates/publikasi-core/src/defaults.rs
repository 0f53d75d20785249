//! Centralized default constants for the publikasi catalog.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic numbers.

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum category name length (characters).
pub const CATEGORY_NAME_MAX_LEN: usize = 100;

/// Maximum publication title length (characters).
pub const TITLE_MAX_LEN: usize = 255;

/// Maximum author name length (characters).
pub const AUTHOR_MAX_LEN: usize = 100;

// =============================================================================
// LISTING
// =============================================================================

/// Size of the "latest", "most downloaded" and "most viewed" rails.
pub const TOP_LIST_LIMIT: i64 = 10;

/// Maximum number of title suggestions returned.
pub const SUGGESTION_LIMIT: i64 = 10;

/// Number of recent search keywords returned per user.
pub const SEARCH_HISTORY_LIMIT: i64 = 10;

/// Default notification page size.
pub const NOTIFICATION_PAGE_SIZE: i64 = 20;

/// Largest notification page a client may request.
pub const NOTIFICATION_PAGE_SIZE_MAX: i64 = 100;

// =============================================================================
// MILESTONES & RETENTION
// =============================================================================

/// Download-count thresholds that trigger an admin notification, ascending.
pub const DOWNLOAD_MILESTONES: [i64; 3] = [100, 500, 1000];

/// Notifications older than this many days are purged.
pub const NOTIFICATION_RETENTION_DAYS: i64 = 7;

/// Upper bound on a configured retention window (ten years).
pub const MAX_NOTIFICATION_RETENTION_DAYS: i64 = 3650;

/// Interval between retention sweeps (once per day).
pub const RETENTION_INTERVAL_SECS: u64 = 24 * 60 * 60;

// =============================================================================
// STORAGE
// =============================================================================

/// Default filesystem root for stored publication files and covers.
pub const FILE_STORAGE_PATH: &str = "/var/lib/publikasi/files";

/// Capacity of broadcast channels used for worker events.
pub const EVENT_BUS_CAPACITY: usize = 64;
