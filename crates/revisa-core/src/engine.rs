//! Revision engine facade
//!
//! Bundles a schedule policy, a batch failure policy and an observer so
//! callers don't thread them through every call. All operations take a
//! snapshot and return a new one.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{EngineError, Result};
use crate::events::{EngineEvent, EngineObserver, NoopObserver};
use crate::ingest::{IngestOutcome, Ingestor, ParsedEvent};
use crate::integrity::{check, IntegrityReport};
use crate::page::{edit_log_timestamp, rename_topic, undo_log, LogEntry, PageRecord};
use crate::queue::{due_items, DueItem, StudyStats};
use crate::recalc::recalculate;
use crate::schedule::{next_due, BatchFailurePolicy, RevisionSettings, SchedulePolicy};

/// Stateless engine configured once per settings change
pub struct RevisionEngine {
    policy: SchedulePolicy,
    failure_policy: BatchFailurePolicy,
    observer: Arc<dyn EngineObserver>,
}

impl Default for RevisionEngine {
    fn default() -> Self {
        Self::new(SchedulePolicy::default())
    }
}

impl RevisionEngine {
    /// Create an engine with the abort failure policy and no observer
    pub fn new(policy: SchedulePolicy) -> Self {
        Self {
            policy,
            failure_policy: BatchFailurePolicy::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Create an engine from stored settings
    pub fn from_settings(settings: &RevisionSettings) -> Self {
        Self::new(SchedulePolicy::from_settings(settings))
    }

    pub fn with_failure_policy(mut self, failure_policy: BatchFailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    pub fn failure_policy(&self) -> BatchFailurePolicy {
        self.failure_policy
    }

    /// Next-due instant for a given last event and revision index
    pub fn next_due(
        &self,
        last_event_time: DateTime<Utc>,
        next_revision_index: u32,
    ) -> Option<DateTime<Utc>> {
        next_due(last_event_time, next_revision_index, &self.policy)
    }

    /// Rebuild one page from its logs
    pub fn recalculate(&self, page: &PageRecord) -> Result<PageRecord> {
        let page = recalculate(page, &self.policy)?;
        self.emit_recalculated(&page);
        Ok(page)
    }

    /// Ingest a batch of parsed events
    pub fn ingest(
        &self,
        batch: &[ParsedEvent],
        pages: &[PageRecord],
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        Ingestor::new(&self.policy)
            .with_failure_policy(self.failure_policy)
            .with_observer(self.observer.as_ref())
            .ingest(batch, pages, now)
    }

    /// Replay every page and repair drift
    pub fn check(&self, pages: &[PageRecord]) -> Result<IntegrityReport> {
        let report = check(pages, &self.policy)?;
        if report.changed {
            tracing::info!(
                repaired = report.repaired.len(),
                checked = pages.len(),
                "Integrity check repaired drifted pages"
            );
            self.observer.on_event(&EngineEvent::IntegrityRepaired {
                page_ids: report.repaired.clone(),
                pages_checked: pages.len(),
            });
        }
        Ok(report)
    }

    /// Remove one log from a page in the collection
    pub fn undo(
        &self,
        pages: &[PageRecord],
        page_id: &str,
        log_id: &str,
    ) -> Result<(Vec<PageRecord>, LogEntry)> {
        let pos = find_page(pages, page_id)?;
        let (page, removed) = undo_log(&pages[pos], log_id, &self.policy)?;

        self.observer.on_event(&EngineEvent::LogRemoved {
            page_id: page.id.clone(),
            log_id: removed.id.clone(),
        });
        self.emit_recalculated(&page);

        let mut pages = pages.to_vec();
        pages[pos] = page;
        Ok((pages, removed))
    }

    /// Move one log to a new timestamp
    pub fn edit_timestamp(
        &self,
        page: &PageRecord,
        log_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PageRecord> {
        let page = edit_log_timestamp(page, log_id, timestamp, &self.policy)?;
        self.emit_recalculated(&page);
        Ok(page)
    }

    /// Rename a topic and its log references
    pub fn rename_topic(&self, page: &PageRecord, from: &str, to: &str) -> Result<PageRecord> {
        let page = rename_topic(page, from, to, &self.policy)?;
        self.emit_recalculated(&page);
        Ok(page)
    }

    pub fn due(&self, pages: &[PageRecord], now: DateTime<Utc>) -> Vec<DueItem> {
        due_items(pages, now)
    }

    pub fn stats(&self, pages: &[PageRecord], now: DateTime<Utc>) -> StudyStats {
        StudyStats::collect(pages, now)
    }

    fn emit_recalculated(&self, page: &PageRecord) {
        self.observer.on_event(&EngineEvent::PageRecalculated {
            page_id: page.id.clone(),
            revision_count: page.revision_count,
            next_revision_at: page.next_revision_at,
        });
    }
}

fn find_page(pages: &[PageRecord], page_id: &str) -> Result<usize> {
    pages
        .iter()
        .position(|page| page.id.trim() == page_id.trim())
        .ok_or_else(|| EngineError::PageNotFound(page_id.to_string()))
}
