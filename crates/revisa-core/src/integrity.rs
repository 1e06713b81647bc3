//! Integrity Checker
//!
//! Replays every page and compares the result with what was stored. Used as
//! a best-effort self-healing pass when the application starts.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::page::PageRecord;
use crate::recalc::recalculate;
use crate::schedule::SchedulePolicy;

/// Outcome of an integrity pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// True when at least one page drifted
    pub changed: bool,
    /// Corrected collection, or the input unchanged
    pub pages: Vec<PageRecord>,
    /// Ids of the pages that drifted
    pub repaired: Vec<String>,
}

/// True when every derived field of `stored` matches `recomputed`.
///
/// Log ids assigned during replay count as a difference so they get saved.
pub fn derived_state_matches(stored: &PageRecord, recomputed: &PageRecord) -> bool {
    stored.logs == recomputed.logs
        && stored.revision_count == recomputed.revision_count
        && stored.current_revision_index == recomputed.current_revision_index
        && stored.first_studied_at == recomputed.first_studied_at
        && stored.last_studied_at == recomputed.last_studied_at
        && stored.next_revision_at == recomputed.next_revision_at
        && stored.topics == recomputed.topics
}

/// Recalculate every page and report drift.
///
/// Any recalculation failure aborts the whole pass.
pub fn check(pages: &[PageRecord], policy: &SchedulePolicy) -> Result<IntegrityReport> {
    let mut corrected = Vec::with_capacity(pages.len());
    let mut repaired = Vec::new();

    for page in pages {
        let recomputed = recalculate(page, policy)?;
        if !derived_state_matches(page, &recomputed) {
            tracing::info!(
                page_id = %page.id,
                stored_next = ?page.next_revision_at,
                recomputed_next = ?recomputed.next_revision_at,
                "Derived state drifted, repairing"
            );
            repaired.push(page.id.clone());
        }
        corrected.push(recomputed);
    }

    if repaired.is_empty() {
        return Ok(IntegrityReport {
            changed: false,
            pages: pages.to_vec(),
            repaired,
        });
    }

    Ok(IntegrityReport {
        changed: true,
        pages: corrected,
        repaired,
    })
}

// ============================================================================
// TESTS
// ============================================================================
