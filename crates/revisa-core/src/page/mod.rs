//! Page Module - Study material records and their event logs
//!
//! A page is one unit of study material, optionally split into topics.
//! Every derived field on a page or topic is a function of the page's log
//! list; see [`crate::recalc`] for how they are rebuilt.

mod edit;
mod record;

pub use edit::{edit_log_timestamp, rename_topic, undo_log};
pub use record::{EntryType, LogEntry, PageRecord, TopicRecord};

/// Identity key for a topic name: trimmed and lowercased
pub fn normalize_topic(name: &str) -> String {
    name.trim().to_lowercase()
}
