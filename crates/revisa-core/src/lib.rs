//! # Revisa Core
//!
//! Spaced-revision recalculation engine for study tracking.
//!
//! - **Schedule Calculator**: hour-offset tables with a target revision cap
//! - **Entry Recalculator**: rebuilds page and topic schedules from the raw log list
//! - **Log Ingestion**: classifies parsed events as STUDY or REVISION, scoped to
//!   the whole page or to a subset of its topics
//! - **Integrity Checker**: replays every page and repairs drifted derived state
//!
//! Derived state is never patched incrementally. Every mutation of a page's
//! logs is followed by a full replay, so the schedule can always be rebuilt
//! from the logs alone.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use revisa_core::{ParsedEvent, PageRecord, RevisionEngine, RevisionSettings};
//!
//! let engine = RevisionEngine::from_settings(&RevisionSettings::default());
//! let pages = vec![PageRecord::with_topics("cardio-1", ["Anatomy", "Physiology"])];
//!
//! let batch = vec![ParsedEvent::new("cardio-1")];
//! let outcome = engine.ingest(&batch, &pages, Utc::now()).unwrap();
//!
//! assert_eq!(outcome.results[0].entry_type.as_str(), "STUDY");
//! assert!(outcome.pages[0].next_revision_at.is_some());
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod engine;
pub mod error;
pub mod events;
pub mod ingest;
pub mod integrity;
pub mod page;
pub mod queue;
pub mod recalc;
pub mod schedule;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use engine::RevisionEngine;
pub use error::{EngineError, Result};

pub use events::{EngineEvent, EngineObserver, NoopObserver, RecordingObserver, TracingObserver};

// Records
pub use page::{
    edit_log_timestamp, normalize_topic, rename_topic, undo_log, EntryType, LogEntry, PageRecord,
    TopicRecord,
};

// Schedule
pub use schedule::{
    next_due, BatchFailurePolicy, PartialRevisionSettings, RevisionSettings, ScheduleMode,
    SchedulePolicy,
};

// Recalculation, ingestion, integrity
pub use ingest::{
    ingest, EventFailure, EventResult, EventScope, IngestOutcome, Ingestor, ParsedEvent,
};
pub use integrity::{check, IntegrityReport};
pub use recalc::{recalculate, DerivedSchedule};

// Views
pub use queue::{due_items, DueItem, StudyStats};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        EngineError, EntryType, EventResult, IngestOutcome, IntegrityReport, LogEntry, PageRecord,
        ParsedEvent, Result, RevisionEngine, RevisionSettings, SchedulePolicy, TopicRecord,
    };
}
