//! Page, topic and log entry records
//!
//! Field names serialise in camelCase so snapshots written by the datastore
//! layer round-trip unchanged.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::normalize_topic;

// ============================================================================
// ENTRY TYPE
// ============================================================================

/// Classification of a logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// First exposure
    Study,
    /// Repeat exposure, advances the revision index
    Revision,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Study => "STUDY",
            EntryType::Revision => "REVISION",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// LOG ENTRY
// ============================================================================

fn new_log_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Id for a stored log that arrived without one: a v5 UUID over the page id,
/// the log's position and its timestamp, so every load yields the same id
fn derived_log_id(page_id: &str, position: usize, timestamp: DateTime<Utc>) -> String {
    let name = format!("{}/{}/{}", page_id, position, timestamp.to_rfc3339());
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

/// One study or revision event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Stable id used by undo/edit; blank until [`PageRecord::assign_log_ids`]
    #[serde(default)]
    pub id: String,
    /// When the event happened; the scheduling clock
    pub timestamp: DateTime<Utc>,
    /// STUDY or REVISION
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Repetition number for revisions, 0 for studies
    #[serde(default)]
    pub revision_index: u32,
    /// Normalized topic names; empty means the whole page
    #[serde(default)]
    pub topics: Vec<String>,
}

impl LogEntry {
    /// Create a log entry with a fresh id
    pub fn new(
        timestamp: DateTime<Utc>,
        entry_type: EntryType,
        revision_index: u32,
        topics: Vec<String>,
    ) -> Self {
        Self {
            id: new_log_id(),
            timestamp,
            entry_type,
            revision_index,
            topics,
        }
    }

    /// True when the entry is framed as whole-page
    pub fn is_whole_page(&self) -> bool {
        self.topics.is_empty()
    }

    /// True when the entry's topic list names `key` (already normalized)
    pub fn names_topic(&self, key: &str) -> bool {
        self.topics.iter().any(|t| normalize_topic(t) == key)
    }
}

// ============================================================================
// TOPIC RECORD
// ============================================================================

/// A named subdivision of a page with its own schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecord {
    /// Display name; identity is case-insensitive
    pub name: String,
    #[serde(default)]
    pub revision_count: u32,
    #[serde(default)]
    pub current_revision_index: u32,
    #[serde(default)]
    pub last_studied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_revision_at: Option<DateTime<Utc>>,
}

impl TopicRecord {
    /// Zero-state topic
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision_count: 0,
            current_revision_index: 0,
            last_studied_at: None,
            next_revision_at: None,
        }
    }

    /// Identity key of this topic
    pub fn key(&self) -> String {
        normalize_topic(&self.name)
    }

    /// Clear every derived field
    pub fn reset(&mut self) {
        self.revision_count = 0;
        self.current_revision_index = 0;
        self.last_studied_at = None;
        self.next_revision_at = None;
    }
}

// ============================================================================
// PAGE RECORD
// ============================================================================

/// One unit of study material with its full event history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Unique page identifier
    pub id: String,
    /// REVISION entries among whole-page logs
    #[serde(default)]
    pub revision_count: u32,
    /// Always equal to `revision_count`
    #[serde(default)]
    pub current_revision_index: u32,
    /// Earliest log of any scope
    #[serde(default)]
    pub first_studied_at: Option<DateTime<Utc>>,
    /// Latest log of any scope
    #[serde(default)]
    pub last_studied_at: Option<DateTime<Utc>>,
    /// None = nothing scheduled
    #[serde(default)]
    pub next_revision_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<TopicRecord>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl PageRecord {
    /// Empty page with no topics or history
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            revision_count: 0,
            current_revision_index: 0,
            first_studied_at: None,
            last_studied_at: None,
            next_revision_at: None,
            topics: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Page with zero-state topics
    pub fn with_topics<I, S>(id: impl Into<String>, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut page = Self::new(id);
        page.topics = topics.into_iter().map(TopicRecord::new).collect();
        page
    }

    /// Clear every derived field on the page and all of its topics
    pub fn reset(&mut self) {
        self.revision_count = 0;
        self.current_revision_index = 0;
        self.first_studied_at = None;
        self.last_studied_at = None;
        self.next_revision_at = None;
        for topic in &mut self.topics {
            topic.reset();
        }
    }

    /// Look a topic up by case-insensitive name
    pub fn topic(&self, name: &str) -> Option<&TopicRecord> {
        let key = normalize_topic(name);
        self.topics.iter().find(|t| t.key() == key)
    }

    /// Normalized names of every topic on the page
    pub fn topic_keys(&self) -> BTreeSet<String> {
        self.topics.iter().map(TopicRecord::key).collect()
    }

    /// Add a zero-state topic unless one with the same key exists.
    ///
    /// Returns true when a topic was created.
    pub fn ensure_topic(&mut self, name: &str) -> bool {
        if self.topic(name).is_some() {
            return false;
        }
        self.topics.push(TopicRecord::new(name.trim()));
        true
    }

    /// Give every log with a blank id a deterministic one.
    ///
    /// Returns how many ids were assigned.
    pub fn assign_log_ids(&mut self) -> usize {
        let mut assigned = 0;
        for (position, log) in self.logs.iter_mut().enumerate() {
            if log.id.trim().is_empty() {
                log.id = derived_log_id(&self.id, position, log.timestamp);
                assigned += 1;
            }
        }
        assigned
    }

    /// Whether any history exists on the page or its topics
    pub fn has_history(&self) -> bool {
        !self.logs.is_empty() || self.topics.iter().any(|t| t.last_studied_at.is_some())
    }
}

// ============================================================================
// TESTS
// ============================================================================
