//! Test Data Factory
//!
//! Provides utilities for generating realistic study data:
//! - Pages with topics and prebuilt log histories
//! - Event batches for ingestion journeys
//! - Deterministic pseudo-random histories for replay properties

use chrono::{DateTime, Duration, TimeZone, Utc};
use revisa_core::{
    recalculate, EntryType, LogEntry, PageRecord, ParsedEvent, SchedulePolicy,
};

/// Factory for creating test data
///
/// # Example
///
/// ```rust,ignore
/// let page = TestDataFactory::cardiology_page();
/// let batch = TestDataFactory::daily_revisions("P1", 5);
/// ```
pub struct TestDataFactory;

/// Configuration for generated histories
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Number of log entries
    pub logs: usize,
    /// Topics on the page
    pub topics: Vec<String>,
    /// Seed for the generator
    pub seed: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            logs: 12,
            topics: vec![
                "Anatomy".to_string(),
                "Physiology".to_string(),
                "Pathology".to_string(),
            ],
            seed: 7,
        }
    }
}

/// Small linear congruential generator, enough for shuffled fixtures
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n.max(1)
    }
}

impl TestDataFactory {
    // ========================================================================
    // TIME
    // ========================================================================

    /// Fixed reference instant
    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    /// `hours` after [`Self::t0`]
    pub fn at(hours: i64) -> DateTime<Utc> {
        Self::t0() + Duration::hours(hours)
    }

    // ========================================================================
    // PAGES
    // ========================================================================

    /// P1 with topics Anatomy and Physiology, no history
    pub fn cardiology_page() -> PageRecord {
        PageRecord::with_topics("P1", ["Anatomy", "Physiology"])
    }

    /// Page whose only logs are `n` whole-page revisions indexed 0..n, ten hours apart
    pub fn revision_chain(id: &str, n: u32) -> PageRecord {
        let mut page = PageRecord::new(id);
        for i in 0..n {
            page.logs.push(LogEntry::new(
                Self::at(i as i64 * 10),
                EntryType::Revision,
                i,
                Vec::new(),
            ));
        }
        page
    }

    /// Page with a mixed, shuffled history across the configured topics
    pub fn random_history(id: &str, config: &HistoryConfig) -> PageRecord {
        let mut rng = Lcg(config.seed);
        let mut page = PageRecord::with_topics(id, config.topics.iter().cloned());

        for i in 0..config.logs {
            let scope: Vec<String> = if config.topics.is_empty() || rng.below(3) == 0 {
                Vec::new()
            } else {
                let pick = rng.below(config.topics.len() as u64) as usize;
                vec![config.topics[pick].to_lowercase()]
            };
            let entry_type = if i == 0 || rng.below(4) == 0 {
                EntryType::Study
            } else {
                EntryType::Revision
            };
            let revision_index = match entry_type {
                EntryType::Study => 0,
                EntryType::Revision => rng.below(6) as u32,
            };
            page.logs.push(LogEntry::new(
                Self::at(rng.below(2000) as i64),
                entry_type,
                revision_index,
                scope,
            ));
        }
        page
    }

    /// Recalculated copy of `page`
    pub fn settled(page: &PageRecord, policy: &SchedulePolicy) -> PageRecord {
        recalculate(page, policy).expect("fixture pages only name their own topics")
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    /// `count` whole-page events one day apart, starting at t0
    pub fn daily_revisions(page_id: &str, count: usize) -> Vec<ParsedEvent> {
        (0..count)
            .map(|i| ParsedEvent::new(page_id).at(Self::at(i as i64 * 24)))
            .collect()
    }

    /// A week of mixed whole-page and topic study across three pages
    pub fn study_week() -> Vec<ParsedEvent> {
        vec![
            ParsedEvent::new("cardio").with_topics(["Anatomy", "Physiology"]).at(Self::at(0)),
            ParsedEvent::new("renal").at(Self::at(2)),
            ParsedEvent::new("cardio").with_topics(["Anatomy"]).at(Self::at(24)),
            ParsedEvent::new("neuro").with_topics(["Cranial Nerves"]).at(Self::at(26)),
            ParsedEvent::new("neuro").with_topics(["Spinal Cord"]).at(Self::at(30)),
            ParsedEvent::new("renal").at(Self::at(48)),
            ParsedEvent::new("cardio").at(Self::at(72)),
            ParsedEvent::new("neuro").with_topics(["cranial nerves"]).at(Self::at(96)),
            ParsedEvent::new("renal").revision().at(Self::at(150)),
        ]
    }
}
