//! Log editing operations
//!
//! Every mutation of a page's log list is followed by recalculation, so the
//! returned record is always valid.

use chrono::{DateTime, Utc};

use super::{normalize_topic, LogEntry, PageRecord};
use crate::error::{EngineError, Result};
use crate::recalc::recalculate;
use crate::schedule::SchedulePolicy;

fn log_position(page: &PageRecord, log_id: &str) -> Result<usize> {
    page.logs
        .iter()
        .position(|log| log.id == log_id)
        .ok_or_else(|| EngineError::LogNotFound {
            page_id: page.id.clone(),
            log_id: log_id.to_string(),
        })
}

/// Remove one log entry by id and recalculate.
///
/// Returns the updated page and the removed entry.
pub fn undo_log(
    page: &PageRecord,
    log_id: &str,
    policy: &SchedulePolicy,
) -> Result<(PageRecord, LogEntry)> {
    let mut working = page.clone();
    working.assign_log_ids();
    let pos = log_position(&working, log_id)?;
    let removed = working.logs.remove(pos);
    let page = recalculate(&working, policy)?;
    Ok((page, removed))
}

/// Move one log entry to a new timestamp and recalculate
pub fn edit_log_timestamp(
    page: &PageRecord,
    log_id: &str,
    timestamp: DateTime<Utc>,
    policy: &SchedulePolicy,
) -> Result<PageRecord> {
    let mut working = page.clone();
    working.assign_log_ids();
    let pos = log_position(&working, log_id)?;
    working.logs[pos].timestamp = timestamp;
    recalculate(&working, policy)
}

/// Rename a topic and rewrite every log that names it.
///
/// Renaming to a name with the same key (a case change) only updates the
/// display name.
pub fn rename_topic(
    page: &PageRecord,
    from: &str,
    to: &str,
    policy: &SchedulePolicy,
) -> Result<PageRecord> {
    let from_key = normalize_topic(from);
    let to_key = normalize_topic(to);

    if to_key.is_empty() {
        return Err(EngineError::InvalidEvent(format!(
            "Topic on page {} cannot be renamed to an empty name",
            page.id
        )));
    }

    let mut working = page.clone();
    let idx = working
        .topics
        .iter()
        .position(|t| t.key() == from_key)
        .ok_or_else(|| EngineError::UnknownTopic {
            page_id: page.id.clone(),
            topic: from.to_string(),
        })?;

    if to_key != from_key && working.topics.iter().any(|t| t.key() == to_key) {
        return Err(EngineError::TopicConflict {
            page_id: page.id.clone(),
            topic: to.trim().to_string(),
        });
    }

    working.topics[idx].name = to.trim().to_string();
    for log in &mut working.logs {
        for topic in &mut log.topics {
            if normalize_topic(topic) == from_key {
                *topic = to_key.clone();
            }
        }
    }

    recalculate(&working, policy)
}

// ============================================================================
// TESTS
// ============================================================================
