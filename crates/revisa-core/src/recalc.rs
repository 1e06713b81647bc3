//! Entry Recalculator
//!
//! Rebuilds every derived schedule field of a page and its topics by
//! replaying the page's log list. Nothing derived is read back while
//! recomputing, so running it twice yields the same record.
//!
//! Scope rules:
//! - `firstStudiedAt` / `lastStudiedAt` on the page span ALL logs
//! - page revision state comes from whole-page logs (empty topic list)
//! - each topic's state comes from logs whose topic list names it

use chrono::{DateTime, Utc};

use crate::error::{EngineError, Result};
use crate::page::{normalize_topic, EntryType, LogEntry, PageRecord};
use crate::schedule::{next_due, next_index_after, SchedulePolicy};

/// Schedule state derived from one subset of logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedSchedule {
    pub revision_count: u32,
    pub last_studied_at: Option<DateTime<Utc>>,
    pub next_revision_at: Option<DateTime<Utc>>,
}

/// Derive schedule state from logs already sorted ascending by timestamp.
///
/// The latest entry alone decides the next due date.
pub fn derive_schedule(sorted: &[&LogEntry], policy: &SchedulePolicy) -> DerivedSchedule {
    let Some(latest) = sorted.last() else {
        return DerivedSchedule::default();
    };

    let revision_count = sorted
        .iter()
        .filter(|log| log.entry_type == EntryType::Revision)
        .count() as u32;

    DerivedSchedule {
        revision_count,
        last_studied_at: Some(latest.timestamp),
        next_revision_at: next_due(latest.timestamp, next_index_after(latest), policy),
    }
}

/// Recompute a page from its logs, returning a new record.
///
/// Logs stored without an id get a deterministic one. Fails with
/// [`EngineError::UnknownTopic`] when a log names a topic the page does not
/// carry.
pub fn recalculate(entry: &PageRecord, policy: &SchedulePolicy) -> Result<PageRecord> {
    let mut source = entry.clone();
    source.assign_log_ids();
    let mut page = source.clone();
    page.reset();

    if page.logs.is_empty() {
        return Ok(page);
    }

    let keys = page.topic_keys();
    for log in &page.logs {
        if let Some(missing) = log
            .topics
            .iter()
            .find(|t| !keys.contains(&normalize_topic(t)))
        {
            return Err(EngineError::UnknownTopic {
                page_id: page.id.clone(),
                topic: missing.clone(),
            });
        }
    }

    // Stable sort: entries sharing a timestamp keep log order, the later one wins
    let mut sorted: Vec<&LogEntry> = source.logs.iter().collect();
    sorted.sort_by_key(|log| log.timestamp);

    page.first_studied_at = sorted.first().map(|log| log.timestamp);
    page.last_studied_at = sorted.last().map(|log| log.timestamp);

    let whole_page: Vec<&LogEntry> = sorted
        .iter()
        .copied()
        .filter(|log| log.is_whole_page())
        .collect();
    let page_state = derive_schedule(&whole_page, policy);
    page.revision_count = page_state.revision_count;
    page.current_revision_index = page_state.revision_count;
    page.next_revision_at = page_state.next_revision_at;

    for topic in &mut page.topics {
        let key = topic.key();
        let subset: Vec<&LogEntry> = sorted
            .iter()
            .copied()
            .filter(|log| log.names_topic(&key))
            .collect();
        let state = derive_schedule(&subset, policy);
        topic.revision_count = state.revision_count;
        topic.current_revision_index = state.revision_count;
        topic.last_studied_at = state.last_studied_at;
        topic.next_revision_at = state.next_revision_at;
    }

    tracing::debug!(
        page_id = %page.id,
        logs = page.logs.len(),
        revision_count = page.revision_count,
        next_revision_at = ?page.next_revision_at,
        "Page recalculated"
    );

    Ok(page)
}

// ============================================================================
// TESTS
// ============================================================================
