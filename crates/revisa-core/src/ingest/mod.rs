//! Log Ingestion
//!
//! Turns parsed study events into log entries:
//!
//! 1. Resolve or create the page, create any newly named topics
//! 2. Frame the event as whole-page or topic-scoped
//! 3. Classify it as STUDY or REVISION and pick its revision index
//! 4. Append the log and recalculate the page before the next event
//!
//! Events in a batch are applied strictly in order; each one sees the
//! recalculated state left by the previous one.

mod batch;
mod classifier;

pub use batch::{ingest, Ingestor};
pub use classifier::{classify, frame_scope, named_topic_keys, Classification};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page::{EntryType, PageRecord};

// ============================================================================
// INPUT
// ============================================================================

/// A structured study event from an upstream parser or UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEvent {
    pub page_id: String,
    /// The user asserted this was a revision
    #[serde(default)]
    pub explicit_revision: bool,
    /// Topic names as entered; empty means the whole page
    #[serde(default)]
    pub topics: Vec<String>,
    /// When it happened; defaults to the ingestion clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ParsedEvent {
    /// Whole-page event with no explicit revision flag
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            explicit_revision: false,
            topics: Vec::new(),
            timestamp: None,
        }
    }

    /// Name topics for this event
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as an explicit revision
    pub fn revision(mut self) -> Self {
        self.explicit_revision = true;
        self
    }

    /// Set the event time
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// How an event was attributed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "topics", rename_all = "snake_case")]
pub enum EventScope {
    /// No topics, or every topic on the page
    WholePage,
    /// A strict subset of the page's topics (normalized names)
    Topics(Vec<String>),
}

/// Confirmation for one ingested event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    pub page_id: String,
    pub log_id: String,
    pub entry_type: EntryType,
    pub scope: EventScope,
    pub revision_index: u32,
    /// Page revision count, or the highest count among the named topics
    pub revision_count: u32,
    /// Earliest next revision across the affected scope
    pub next_revision_at: Option<DateTime<Utc>>,
    /// Human-readable confirmation
    pub message: String,
}

/// An event dropped under the skip-and-continue policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFailure {
    /// Position in the batch
    pub index: usize,
    pub page_id: String,
    pub error: String,
}

/// Result of ingesting one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub results: Vec<EventResult>,
    pub failures: Vec<EventFailure>,
    /// Full page collection after the batch, new pages appended
    pub pages: Vec<PageRecord>,
}
