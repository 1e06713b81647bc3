//! Event classifier
//!
//! Decides scope framing, entry type and revision index for an event
//! against the page state it will be appended to. The page passed in must
//! be freshly recalculated and already carry every topic the event names.

use std::collections::BTreeSet;

use super::{EventScope, ParsedEvent};
use crate::page::{normalize_topic, EntryType, PageRecord};

/// How an event will be logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub scope: EventScope,
    pub entry_type: EntryType,
    pub revision_index: u32,
}

impl Classification {
    /// Topic list stored on the log entry
    pub fn log_topics(&self) -> Vec<String> {
        match &self.scope {
            EventScope::WholePage => Vec::new(),
            EventScope::Topics(topics) => topics.clone(),
        }
    }
}

/// Normalized, de-duplicated topic names in entry order; blanks dropped
pub fn named_topic_keys(event: &ParsedEvent) -> Vec<String> {
    let mut seen = BTreeSet::new();
    event
        .topics
        .iter()
        .map(|t| normalize_topic(t))
        .filter(|key| !key.is_empty() && seen.insert(key.clone()))
        .collect()
}

/// Whole-page when nothing is named or everything on the page is named
pub fn frame_scope(page: &PageRecord, named: &[String]) -> EventScope {
    if named.is_empty() {
        return EventScope::WholePage;
    }
    let named_set: BTreeSet<String> = named.iter().cloned().collect();
    if named_set == page.topic_keys() {
        EventScope::WholePage
    } else {
        EventScope::Topics(named.to_vec())
    }
}

/// Classify `event` against the current state of `page`
pub fn classify(page: &PageRecord, event: &ParsedEvent) -> Classification {
    let named = named_topic_keys(event);
    let scope = frame_scope(page, &named);

    let entry_type = if event.explicit_revision || has_prior_history(page, &scope) {
        EntryType::Revision
    } else {
        EntryType::Study
    };

    let revision_index = match entry_type {
        EntryType::Study => 0,
        EntryType::Revision => match &scope {
            EventScope::WholePage => page.revision_count.saturating_add(1),
            EventScope::Topics(keys) => keys
                .iter()
                .filter_map(|key| page.topic(key))
                .map(|topic| topic.revision_count.saturating_add(1))
                .max()
                .unwrap_or(1),
        },
    };

    Classification {
        scope,
        entry_type,
        revision_index,
    }
}

fn has_prior_history(page: &PageRecord, scope: &EventScope) -> bool {
    match scope {
        EventScope::WholePage => page.has_history(),
        EventScope::Topics(keys) => keys
            .iter()
            .filter_map(|key| page.topic(key))
            .any(|topic| topic.last_studied_at.is_some()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
