//! Schedule calculator

use chrono::{DateTime, Duration, Utc};

use super::SchedulePolicy;
use crate::page::{EntryType, LogEntry};

/// Next-due instant after an event, or None when nothing more is scheduled.
///
/// Returns None when `next_revision_index` is past the table or at/over the
/// target count. Arithmetic overflow is treated the same way.
pub fn next_due(
    last_event_time: DateTime<Utc>,
    next_revision_index: u32,
    policy: &SchedulePolicy,
) -> Option<DateTime<Utc>> {
    let hours = policy.offset_hours(next_revision_index)?;
    last_event_time.checked_add_signed(Duration::hours(i64::from(hours)))
}

/// Revision index to schedule after `latest`.
///
/// A study schedules the first revision (index 0); a revision schedules the
/// one after it.
pub fn next_index_after(latest: &LogEntry) -> u32 {
    match latest.entry_type {
        EntryType::Study => 0,
        EntryType::Revision => latest.revision_index.saturating_add(1),
    }
}

// ============================================================================
// TESTS
// ============================================================================
