//! Settings resolution
//!
//! Precedence, lowest first: built-in defaults, the JSON settings file,
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;

use revisa_core::{BatchFailurePolicy, PartialRevisionSettings, RevisionSettings};

pub const ENV_SCHEDULE_MODE: &str = "REVISA_SCHEDULE_MODE";
pub const ENV_TARGET_COUNT: &str = "REVISA_TARGET_COUNT";
pub const ENV_ON_ERROR: &str = "REVISA_ON_ERROR";

/// Settings file layout
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(flatten)]
    revision: PartialRevisionSettings,
    #[serde(default)]
    on_error: Option<BatchFailurePolicy>,
}

/// Fully resolved CLI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub settings: RevisionSettings,
    pub failure_policy: BatchFailurePolicy,
    /// File the settings came from, if any
    pub source: Option<PathBuf>,
}

/// `settings.json` in the platform config directory
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "revisa", "revisa").map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Resolve configuration from an optional explicit file and the process environment
pub fn load(explicit: Option<&Path>) -> anyhow::Result<CliConfig> {
    resolve(explicit, default_settings_path(), |key| std::env::var(key).ok())
}

/// Resolve configuration with an injectable environment.
///
/// An explicit file must exist; the default file is optional.
pub fn resolve<F>(
    explicit: Option<&Path>,
    default_path: Option<PathBuf>,
    env: F,
) -> anyhow::Result<CliConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let (file, source) = match explicit {
        Some(path) => (read_settings_file(path)?, Some(path.to_path_buf())),
        None => match default_path.filter(|p| p.exists()) {
            Some(path) => (read_settings_file(&path)?, Some(path)),
            None => (SettingsFile::default(), None),
        },
    };

    let mut settings = RevisionSettings::default().merge(&file.revision);
    let mut failure_policy = file.on_error.unwrap_or_default();

    let overrides = PartialRevisionSettings {
        mode: env(ENV_SCHEDULE_MODE),
        target_count: env(ENV_TARGET_COUNT)
            .map(|raw| {
                raw.trim().parse::<u32>().with_context(|| {
                    format!("{} must be a non-negative integer, got '{}'", ENV_TARGET_COUNT, raw)
                })
            })
            .transpose()?,
    };
    settings = settings.merge(&overrides);

    if let Some(raw) = env(ENV_ON_ERROR) {
        failure_policy = raw
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{}: {}", ENV_ON_ERROR, e))?;
    }

    tracing::debug!(
        mode = %settings.mode,
        target_count = settings.target_count,
        on_error = %failure_policy,
        source = ?source,
        "Settings resolved"
    );

    Ok(CliConfig {
        settings,
        failure_policy,
        source,
    })
}

fn read_settings_file(path: &Path) -> anyhow::Result<SettingsFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid settings file {}", path.display()))
}
