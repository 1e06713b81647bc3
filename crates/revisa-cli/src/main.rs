//! Revisa CLI
//!
//! Command-line interface over JSON snapshots of the page collection:
//! integrity checks, batch ingestion, undo, due queue and statistics.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;

use revisa_cli::config::{self, CliConfig};
use revisa_cli::logging;
use revisa_cli::snapshot::{load_events, load_pages, save_pages};
use revisa_core::{
    BatchFailurePolicy, EntryType, EventScope, RecordingObserver, RevisionEngine, SchedulePolicy,
};

/// Revisa - spaced-revision schedule engine CLI
#[derive(Parser)]
#[command(name = "revisa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recalculate, check and ingest study revision schedules")]
#[command(long_about = "Revisa replays study logs into page and topic revision schedules.\n\nAll commands read a JSON snapshot of the page collection and only write it back with --write.")]
struct Cli {
    /// Settings file (defaults to settings.json in the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay every page and report drifted derived state
    Check {
        /// Pages snapshot
        pages: PathBuf,
        /// Save the corrected snapshot
        #[arg(long)]
        write: bool,
    },

    /// Ingest a batch of parsed study events
    Ingest {
        /// Pages snapshot
        pages: PathBuf,
        /// Events file (JSON array)
        events: PathBuf,
        /// Save the updated snapshot
        #[arg(long)]
        write: bool,
        /// Failure handling: abort or skip
        #[arg(long)]
        on_error: Option<String>,
    },

    /// List a page's log entries with their ids
    Logs {
        /// Pages snapshot
        pages: PathBuf,
        page_id: String,
    },

    /// Remove one log entry and recalculate its page
    Undo {
        /// Pages snapshot
        pages: PathBuf,
        page_id: String,
        log_id: String,
        /// Save the updated snapshot
        #[arg(long)]
        write: bool,
    },

    /// List pages and topics due for revision
    Due {
        /// Pages snapshot
        pages: PathBuf,
        /// Reference time (ISO 8601, defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Show collection statistics
    Stats {
        /// Pages snapshot
        pages: PathBuf,
    },

    /// Compute a next-due time directly
    NextDue {
        /// Last event time (ISO 8601)
        #[arg(long)]
        last: String,
        /// Revision index to schedule
        #[arg(long)]
        index: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries reports, logs go to stderr
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(logging::env_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let config = config::load(cli.settings.as_deref())?;

    match cli.command {
        Commands::Check { pages, write } => run_check(&config, &pages, write),
        Commands::Ingest {
            pages,
            events,
            write,
            on_error,
        } => run_ingest(&config, &pages, &events, write, on_error),
        Commands::Logs { pages, page_id } => run_logs(&config, &pages, &page_id),
        Commands::Undo {
            pages,
            page_id,
            log_id,
            write,
        } => run_undo(&config, &pages, &page_id, &log_id, write),
        Commands::Due { pages, at } => run_due(&pages, at),
        Commands::Stats { pages } => run_stats(&config, &pages),
        Commands::NextDue { last, index } => run_next_due(&config, &last, index),
    }
}

fn parse_instant(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| anyhow::anyhow!("Invalid timestamp '{}': {}", raw, e))?
        .with_timezone(&Utc))
}

fn format_due(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "mastered".to_string(),
    }
}

/// Run check command
fn run_check(config: &CliConfig, path: &Path, write: bool) -> anyhow::Result<()> {
    let engine = RevisionEngine::from_settings(&config.settings);
    let pages = load_pages(path)?;
    let report = engine.check(&pages)?;

    println!("{}", "=== Revisa Integrity Check ===".cyan().bold());
    println!();
    println!("{}: {}", "Pages Checked".white().bold(), pages.len());
    println!(
        "{}: {} ({} steps, target {})",
        "Schedule".white().bold(),
        config.settings.mode,
        engine.policy().hours().len(),
        engine.policy().target_count()
    );

    if !report.changed {
        println!();
        println!("{}", "All derived state matches the logs.".green());
        return Ok(());
    }

    println!("{}: {}", "Drifted".yellow().bold(), report.repaired.len());
    for page_id in &report.repaired {
        println!("  {} {}", "~".yellow(), page_id);
    }

    if write {
        save_pages(path, &report.pages)?;
        println!();
        println!("{}", "Corrected snapshot written.".green());
    } else {
        println!();
        println!("{}", "Run with --write to save the corrected snapshot.".dimmed());
    }
    Ok(())
}

/// Run ingest command
fn run_ingest(
    config: &CliConfig,
    pages_path: &Path,
    events_path: &Path,
    write: bool,
    on_error: Option<String>,
) -> anyhow::Result<()> {
    let failure_policy: BatchFailurePolicy = match on_error {
        Some(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.failure_policy,
    };

    let observer = Arc::new(RecordingObserver::new());
    let engine = RevisionEngine::from_settings(&config.settings)
        .with_failure_policy(failure_policy)
        .with_observer(observer.clone());

    let pages = load_pages(pages_path)?;
    let batch = load_events(events_path)?;
    let outcome = engine.ingest(&batch, &pages, Utc::now())?;

    println!("{}", "=== Revisa Ingest ===".cyan().bold());
    println!();
    for result in &outcome.results {
        let tag = match result.entry_type {
            EntryType::Study => "STUDY".green(),
            EntryType::Revision => "REVISION".blue(),
        };
        let scope = match &result.scope {
            EventScope::WholePage => String::new(),
            EventScope::Topics(topics) => format!(" [{}]", topics.join(", ")),
        };
        println!("  {:<9} {}{}", tag, result.page_id.bold(), scope.dimmed());
        println!("            {}", result.message);
        println!("            {} {}", "log".dimmed(), result.log_id.dimmed());
    }

    for failure in &outcome.failures {
        println!(
            "  {:<9} event #{} ({}): {}",
            "SKIPPED".red(),
            failure.index,
            failure.page_id,
            failure.error
        );
    }

    println!();
    println!(
        "{}: {} logged, {} skipped, {} engine events",
        "Summary".white().bold(),
        outcome.results.len(),
        outcome.failures.len(),
        observer.events().len()
    );

    if write {
        save_pages(pages_path, &outcome.pages)?;
        println!("{}", "Snapshot written.".green());
    }
    Ok(())
}

/// Run logs command
fn run_logs(config: &CliConfig, path: &Path, page_id: &str) -> anyhow::Result<()> {
    let engine = RevisionEngine::from_settings(&config.settings);
    let pages = load_pages(path)?;
    let page = pages
        .iter()
        .find(|p| p.id.trim() == page_id.trim())
        .ok_or_else(|| anyhow::anyhow!("Page not found: {}", page_id))?;
    // Replay so logs stored without an id show the one undo will accept
    let page = engine.recalculate(page)?;

    println!("{}", format!("=== Logs for {} ===", page.id).as_str().cyan().bold());
    println!();
    if page.logs.is_empty() {
        println!("{}", "No log entries.".dimmed());
        return Ok(());
    }

    let mut logs: Vec<_> = page.logs.iter().collect();
    logs.sort_by_key(|log| log.timestamp);
    for log in logs {
        let scope = if log.topics.is_empty() {
            "whole page".to_string()
        } else {
            log.topics.join(", ")
        };
        println!(
            "  {}  {:<9} #{:<3} {:<30} {}",
            log.timestamp.format("%Y-%m-%d %H:%M"),
            log.entry_type.as_str(),
            log.revision_index,
            scope,
            log.id.dimmed()
        );
    }
    Ok(())
}

/// Run undo command
fn run_undo(
    config: &CliConfig,
    path: &Path,
    page_id: &str,
    log_id: &str,
    write: bool,
) -> anyhow::Result<()> {
    let engine = RevisionEngine::from_settings(&config.settings);
    let pages = load_pages(path)?;
    let (pages, removed) = engine.undo(&pages, page_id, log_id)?;

    println!(
        "{} {} log from {} at {}",
        "Removed".yellow().bold(),
        removed.entry_type,
        page_id,
        removed.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(page) = pages.iter().find(|p| p.id == page_id) {
        println!(
            "{}: {} revisions, next {}",
            "Page".white().bold(),
            page.revision_count,
            format_due(page.next_revision_at)
        );
    }

    if write {
        save_pages(path, &pages)?;
        println!("{}", "Snapshot written.".green());
    }
    Ok(())
}

/// Run due command
fn run_due(path: &Path, at: Option<String>) -> anyhow::Result<()> {
    let now = match at {
        Some(raw) => parse_instant(&raw)?,
        None => Utc::now(),
    };
    let pages = load_pages(path)?;
    let items = revisa_core::due_items(&pages, now);

    println!("{}", "=== Due for Revision ===".cyan().bold());
    println!();
    if items.is_empty() {
        println!("{}", "Nothing due.".dimmed());
        return Ok(());
    }

    for item in &items {
        let target = match &item.topic {
            Some(topic) => format!("{} / {}", item.page_id, topic),
            None => item.page_id.clone(),
        };
        let overdue = if item.overdue_hours >= 24 {
            format!("{}d overdue", item.overdue_hours / 24).red()
        } else {
            format!("{}h overdue", item.overdue_hours).yellow()
        };
        println!("  {:<40} {}", target, overdue);
    }
    println!();
    println!("{}: {}", "Total Due".white().bold(), items.len());
    Ok(())
}

/// Run stats command
fn run_stats(config: &CliConfig, path: &Path) -> anyhow::Result<()> {
    let engine = RevisionEngine::from_settings(&config.settings);
    let pages = load_pages(path)?;
    let stats = engine.stats(&pages, Utc::now());

    println!("{}", "=== Revisa Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Pages".white().bold(), stats.total_pages);
    println!("{}: {}", "Topics".white().bold(), stats.total_topics);
    println!("{}: {}", "Log Entries".white().bold(), stats.total_logs);
    println!("{}: {}", "Due Now".white().bold(), stats.due_now);
    println!("{}: {}", "Mastered Pages".white().bold(), stats.mastered_pages);
    println!("{}: {}", "Never Studied".white().bold(), stats.never_studied);
    if let Some(oldest) = stats.oldest_study {
        println!("{}: {}", "First Study".white().bold(), oldest.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(newest) = stats.newest_study {
        println!("{}: {}", "Latest Study".white().bold(), newest.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

/// Run next-due command
fn run_next_due(config: &CliConfig, last: &str, index: u32) -> anyhow::Result<()> {
    let policy = SchedulePolicy::from_settings(&config.settings);
    let last = parse_instant(last)?;
    let due = revisa_core::next_due(last, index, &policy);
    println!("{}", format_due(due));
    Ok(())
}
