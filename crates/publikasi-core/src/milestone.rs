//! Download milestone detection.
//!
//! A milestone is crossed when a single increment moves the download count
//! from below a threshold to at or above it. When one jump crosses several
//! thresholds only the highest is reported, so admins get one notification.

use crate::defaults::DOWNLOAD_MILESTONES;

/// Highest threshold `t` in `thresholds` with `previous < t <= new`.
///
/// `thresholds` must be sorted ascending.
pub fn detect_with(thresholds: &[i64], previous: i64, new: i64) -> Option<i64> {
    thresholds
        .iter()
        .rev()
        .copied()
        .find(|&t| previous < t && t <= new)
}

/// [`detect_with`] over the static thresholds 100, 500 and 1000.
pub fn detect(previous: i64, new: i64) -> Option<i64> {
    detect_with(&DOWNLOAD_MILESTONES, previous, new)
}
