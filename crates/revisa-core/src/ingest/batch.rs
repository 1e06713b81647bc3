//! Batch ingestion loop

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{classify, EventFailure, EventResult, EventScope, IngestOutcome, ParsedEvent};
use crate::error::{EngineError, Result};
use crate::events::{EngineEvent, EngineObserver, NoopObserver};
use crate::page::{EntryType, LogEntry, PageRecord};
use crate::recalc::recalculate;
use crate::schedule::{BatchFailurePolicy, SchedulePolicy};

static NOOP: NoopObserver = NoopObserver;

/// Ingest a batch with the default (abort) failure policy and the wall clock
pub fn ingest(
    batch: &[ParsedEvent],
    pages: &[PageRecord],
    policy: &SchedulePolicy,
) -> Result<IngestOutcome> {
    Ingestor::new(policy).ingest(batch, pages, Utc::now())
}

/// One event applied to a scratch copy of its page
struct AppliedEvent {
    page: PageRecord,
    result: EventResult,
    events: Vec<EngineEvent>,
}

/// Configurable batch ingestor
pub struct Ingestor<'a> {
    policy: &'a SchedulePolicy,
    failure_policy: BatchFailurePolicy,
    observer: &'a dyn EngineObserver,
}

impl<'a> Ingestor<'a> {
    pub fn new(policy: &'a SchedulePolicy) -> Self {
        Self {
            policy,
            failure_policy: BatchFailurePolicy::default(),
            observer: &NOOP,
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: BatchFailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn EngineObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Apply every event in order.
    ///
    /// `now` stamps events that carry no timestamp. The input collection is
    /// never modified; under [`BatchFailurePolicy::Abort`] a failure returns
    /// [`EngineError::BatchAborted`] and nothing is observed.
    pub fn ingest(
        &self,
        batch: &[ParsedEvent],
        pages: &[PageRecord],
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        let mut pages = pages.to_vec();
        let mut positions: HashMap<String, usize> = pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page.id.trim().to_string(), i))
            .collect();

        let mut results = Vec::with_capacity(batch.len());
        let mut failures = Vec::new();
        let mut pending = Vec::new();

        for (index, event) in batch.iter().enumerate() {
            let existing = positions
                .get(event.page_id.trim())
                .map(|&pos| &pages[pos]);

            match self.apply(event, existing, now) {
                Ok(applied) => {
                    match positions.get(applied.page.id.trim()) {
                        Some(&pos) => pages[pos] = applied.page,
                        None => {
                            positions.insert(applied.page.id.trim().to_string(), pages.len());
                            pages.push(applied.page);
                        }
                    }
                    tracing::info!(
                        page_id = %applied.result.page_id,
                        entry_type = %applied.result.entry_type,
                        revision_index = applied.result.revision_index,
                        "{}",
                        applied.result.message
                    );
                    pending.extend(applied.events);
                    results.push(applied.result);
                }
                Err(e) => match self.failure_policy {
                    BatchFailurePolicy::Abort => {
                        tracing::warn!(index, page_id = %event.page_id, "Aborting batch: {}", e);
                        return Err(EngineError::BatchAborted {
                            index,
                            source: Box::new(e),
                        });
                    }
                    BatchFailurePolicy::SkipAndContinue => {
                        tracing::warn!(index, page_id = %event.page_id, "Skipping event: {}", e);
                        pending.push(EngineEvent::EventSkipped {
                            index,
                            page_id: event.page_id.clone(),
                            reason: e.to_string(),
                        });
                        failures.push(EventFailure {
                            index,
                            page_id: event.page_id.clone(),
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        for event in &pending {
            self.observer.on_event(event);
        }

        Ok(IngestOutcome {
            results,
            failures,
            pages,
        })
    }

    fn apply(
        &self,
        event: &ParsedEvent,
        existing: Option<&PageRecord>,
        now: DateTime<Utc>,
    ) -> Result<AppliedEvent> {
        let page_id = event.page_id.trim();
        if page_id.is_empty() {
            return Err(EngineError::InvalidEvent("event has no page id".to_string()));
        }

        let mut events = Vec::new();
        // Classification reads derived state, so it must come from the logs
        let mut page = match existing {
            Some(page) => recalculate(page, self.policy)?,
            None => {
                events.push(EngineEvent::PageCreated {
                    page_id: page_id.to_string(),
                });
                PageRecord::new(page_id)
            }
        };

        for name in &event.topics {
            if !name.trim().is_empty() && page.ensure_topic(name) {
                events.push(EngineEvent::TopicCreated {
                    page_id: page.id.clone(),
                    topic: name.trim().to_string(),
                });
            }
        }

        let classification = classify(&page, event);
        let log = LogEntry::new(
            event.timestamp.unwrap_or(now),
            classification.entry_type,
            classification.revision_index,
            classification.log_topics(),
        );
        page.logs.push(log.clone());

        let page = recalculate(&page, self.policy)?;

        let (revision_count, next_revision_at) = match &classification.scope {
            EventScope::WholePage => (page.revision_count, page.next_revision_at),
            EventScope::Topics(keys) => {
                let named: Vec<_> = keys.iter().filter_map(|key| page.topic(key)).collect();
                (
                    named.iter().map(|t| t.revision_count).max().unwrap_or(0),
                    named.iter().filter_map(|t| t.next_revision_at).min(),
                )
            }
        };

        events.push(EngineEvent::EventLogged {
            page_id: page.id.clone(),
            log_id: log.id.clone(),
            entry_type: log.entry_type,
            revision_index: log.revision_index,
            topics: log.topics.clone(),
            timestamp: log.timestamp,
        });
        events.push(EngineEvent::PageRecalculated {
            page_id: page.id.clone(),
            revision_count: page.revision_count,
            next_revision_at: page.next_revision_at,
        });

        let message = confirmation(&page.id, &classification.scope, &log, next_revision_at);
        let result = EventResult {
            page_id: page.id.clone(),
            log_id: log.id,
            entry_type: log.entry_type,
            scope: classification.scope,
            revision_index: log.revision_index,
            revision_count,
            next_revision_at,
            message,
        };

        Ok(AppliedEvent {
            page,
            result,
            events,
        })
    }
}

fn confirmation(
    page_id: &str,
    scope: &EventScope,
    log: &LogEntry,
    next_revision_at: Option<DateTime<Utc>>,
) -> String {
    let what = match log.entry_type {
        EntryType::Study => "first study".to_string(),
        EntryType::Revision => format!("revision #{}", log.revision_index),
    };
    let target = match scope {
        EventScope::WholePage => page_id.to_string(),
        EventScope::Topics(topics) => format!("{} ({})", page_id, topics.join(", ")),
    };
    let next = match next_revision_at {
        Some(at) => format!("next revision due {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => "no further revision scheduled".to_string(),
    };
    format!("Logged {} of {}; {}", what, target, next)
}

// ============================================================================
// TESTS
// ============================================================================
