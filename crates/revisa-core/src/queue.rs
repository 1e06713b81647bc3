//! Due queue and study statistics
//!
//! Read-only views over an already recalculated page collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page::PageRecord;

/// A page or topic whose next revision is due
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueItem {
    pub page_id: String,
    /// None for the page itself
    pub topic: Option<String>,
    pub next_revision_at: DateTime<Utc>,
    /// Whole hours since it became due
    pub overdue_hours: i64,
}

/// Every page and topic due at `now`, oldest first
pub fn due_items(pages: &[PageRecord], now: DateTime<Utc>) -> Vec<DueItem> {
    let mut items = Vec::new();

    for page in pages {
        if let Some(at) = page.next_revision_at.filter(|at| *at <= now) {
            items.push(DueItem {
                page_id: page.id.clone(),
                topic: None,
                next_revision_at: at,
                overdue_hours: (now - at).num_hours(),
            });
        }
        for topic in &page.topics {
            if let Some(at) = topic.next_revision_at.filter(|at| *at <= now) {
                items.push(DueItem {
                    page_id: page.id.clone(),
                    topic: Some(topic.name.clone()),
                    next_revision_at: at,
                    overdue_hours: (now - at).num_hours(),
                });
            }
        }
    }

    items.sort_by(|a, b| {
        a.next_revision_at
            .cmp(&b.next_revision_at)
            .then_with(|| a.page_id.cmp(&b.page_id))
    });
    items
}

/// Collection-wide counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_pages: usize,
    pub total_topics: usize,
    pub total_logs: usize,
    /// Pages and topics due at the time of collection
    pub due_now: usize,
    /// Pages with history where neither the page nor any topic has a revision scheduled
    pub mastered_pages: usize,
    /// Pages without any log
    pub never_studied: usize,
    pub oldest_study: Option<DateTime<Utc>>,
    pub newest_study: Option<DateTime<Utc>>,
}

impl StudyStats {
    pub fn collect(pages: &[PageRecord], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total_pages: pages.len(),
            due_now: due_items(pages, now).len(),
            ..Default::default()
        };

        for page in pages {
            stats.total_topics += page.topics.len();
            stats.total_logs += page.logs.len();

            if page.logs.is_empty() {
                stats.never_studied += 1;
            } else if page.next_revision_at.is_none()
                && page.topics.iter().all(|t| t.next_revision_at.is_none())
            {
                stats.mastered_pages += 1;
            }

            stats.oldest_study = match (stats.oldest_study, page.first_studied_at) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            stats.newest_study = match (stats.newest_study, page.last_studied_at) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }

        stats
    }
}
