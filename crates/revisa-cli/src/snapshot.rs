//! JSON snapshot files
//!
//! A pages snapshot is a JSON array of page records; an events file is a
//! JSON array of parsed events. Writes go through a sibling temp file and a
//! rename so a crash never leaves a half-written snapshot.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use revisa_core::{PageRecord, ParsedEvent};

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid {} file {}", what, path.display()))
}

pub fn load_pages(path: &Path) -> anyhow::Result<Vec<PageRecord>> {
    read_json(path, "pages")
}

pub fn load_events(path: &Path) -> anyhow::Result<Vec<ParsedEvent>> {
    read_json(path, "events")
}

pub fn save_pages(path: &Path, pages: &[PageRecord]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(pages)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    tracing::info!(path = %path.display(), pages = pages.len(), "Snapshot saved");
    Ok(())
}
