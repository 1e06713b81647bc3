//! Engine events and observers
//!
//! Callers that mirror engine activity elsewhere (sync-status badges, audit
//! trails, CLI summaries) hand an observer to the engine explicitly. There
//! is no process-wide listener registry.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::page::EntryType;

/// Every engine mutation emits one of these events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineEvent {
    // -- Records --
    PageCreated {
        page_id: String,
    },
    TopicCreated {
        page_id: String,
        topic: String,
    },

    // -- Logs --
    EventLogged {
        page_id: String,
        log_id: String,
        entry_type: EntryType,
        revision_index: u32,
        topics: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    EventSkipped {
        index: usize,
        page_id: String,
        reason: String,
    },
    LogRemoved {
        page_id: String,
        log_id: String,
    },

    // -- Schedule --
    PageRecalculated {
        page_id: String,
        revision_count: u32,
        next_revision_at: Option<DateTime<Utc>>,
    },
    IntegrityRepaired {
        page_ids: Vec<String>,
        pages_checked: usize,
    },
}

impl EngineEvent {
    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Page the event concerns, if it concerns exactly one
    pub fn page_id(&self) -> Option<&str> {
        match self {
            EngineEvent::PageCreated { page_id }
            | EngineEvent::TopicCreated { page_id, .. }
            | EngineEvent::EventLogged { page_id, .. }
            | EngineEvent::EventSkipped { page_id, .. }
            | EngineEvent::LogRemoved { page_id, .. }
            | EngineEvent::PageRecalculated { page_id, .. } => Some(page_id),
            EngineEvent::IntegrityRepaired { .. } => None,
        }
    }
}

// ============================================================================
// OBSERVERS
// ============================================================================

/// Receives engine events
pub trait EngineObserver: Send + Sync {
    fn on_event(&self, event: &EngineEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EngineObserver for NoopObserver {
    fn on_event(&self, _event: &EngineEvent) {}
}

/// Forwards events to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn on_event(&self, event: &EngineEvent) {
        tracing::debug!(event = %event.to_json(), "engine event");
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<EngineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<EngineEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EngineObserver for RecordingObserver {
    fn on_event(&self, event: &EngineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
