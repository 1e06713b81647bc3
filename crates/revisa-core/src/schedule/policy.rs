//! Schedule policies and revision settings
//!
//! Settings are what the user stores; a policy is what the calculator runs on.
//! Partial settings (as loaded from a file or a UI form) are layered over
//! defaults with an explicit merge instead of ad-hoc field spreading.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Short intervals for crash revision before an exam
pub const INTENSIVE_HOURS: [u32; 7] = [12, 24, 48, 96, 168, 336, 672];

/// General purpose table (1d, 3d, 1w, 2w, 1mo, 2mo, 3mo, 6mo, 9mo, 1y)
pub const BALANCED_HOURS: [u32; 10] = [24, 72, 168, 336, 720, 1440, 2160, 4320, 6480, 8760];

/// Long intervals for material that only needs occasional refreshing
pub const RELAXED_HOURS: [u32; 7] = [48, 168, 504, 1080, 2160, 4320, 8760];

/// Mode used when settings name none (or an unknown one)
pub const DEFAULT_MODE: ScheduleMode = ScheduleMode::Balanced;

/// Default cap on scheduled revisions
pub const DEFAULT_TARGET_COUNT: u32 = 6;

// ============================================================================
// SCHEDULE MODE
// ============================================================================

/// Named hour-offset tables
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// Dense early repetitions
    Intensive,
    /// The default curve
    #[default]
    Balanced,
    /// Sparse repetitions
    Relaxed,
}

impl ScheduleMode {
    /// Hour offsets for this mode, indexed by revision number
    pub fn hours(&self) -> &'static [u32] {
        match self {
            ScheduleMode::Intensive => &INTENSIVE_HOURS,
            ScheduleMode::Balanced => &BALANCED_HOURS,
            ScheduleMode::Relaxed => &RELAXED_HOURS,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleMode::Intensive => "intensive",
            ScheduleMode::Balanced => "balanced",
            ScheduleMode::Relaxed => "relaxed",
        }
    }
}

impl std::fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScheduleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intensive" => Ok(ScheduleMode::Intensive),
            "balanced" => Ok(ScheduleMode::Balanced),
            "relaxed" => Ok(ScheduleMode::Relaxed),
            _ => Err(format!("Unknown schedule mode: {}", s)),
        }
    }
}

// ============================================================================
// REVISION SETTINGS
// ============================================================================

/// User-facing revision settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSettings {
    /// Name of the schedule table ("intensive", "balanced", "relaxed")
    pub mode: String,
    /// Maximum number of revisions to schedule
    pub target_count: u32,
}

impl Default for RevisionSettings {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.as_str().to_string(),
            target_count: DEFAULT_TARGET_COUNT,
        }
    }
}

/// Settings as loaded from a file or form, any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRevisionSettings {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub target_count: Option<u32>,
}

impl RevisionSettings {
    /// Layer `partial` over `self`; present fields win
    pub fn merge(&self, partial: &PartialRevisionSettings) -> Self {
        Self {
            mode: partial.mode.clone().unwrap_or_else(|| self.mode.clone()),
            target_count: partial.target_count.unwrap_or(self.target_count),
        }
    }
}

// ============================================================================
// SCHEDULE POLICY
// ============================================================================

/// Resolved policy the schedule calculator runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    hours: Vec<u32>,
    target_count: u32,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self::from_mode(DEFAULT_MODE, DEFAULT_TARGET_COUNT)
    }
}

impl SchedulePolicy {
    /// Policy backed by one of the named tables
    pub fn from_mode(mode: ScheduleMode, target_count: u32) -> Self {
        Self {
            hours: mode.hours().to_vec(),
            target_count,
        }
    }

    /// Resolve settings into a policy.
    ///
    /// An unrecognised mode falls back to the default table.
    pub fn from_settings(settings: &RevisionSettings) -> Self {
        let mode = settings.mode.parse::<ScheduleMode>().unwrap_or_else(|e| {
            tracing::warn!(mode = %settings.mode, fallback = %DEFAULT_MODE, "{}", e);
            DEFAULT_MODE
        });
        Self::from_mode(mode, settings.target_count)
    }

    /// Policy with a caller-supplied table. An empty table schedules nothing.
    pub fn custom(hours: Vec<u32>, target_count: u32) -> Self {
        Self {
            hours,
            target_count,
        }
    }

    /// Hour offsets indexed by revision number
    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    /// Cap on scheduled revisions
    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    /// Offset for `index`, or None once the entity is mastered
    pub fn offset_hours(&self, index: u32) -> Option<u32> {
        if index >= self.target_count {
            return None;
        }
        self.hours.get(index as usize).copied()
    }
}

// ============================================================================
// BATCH FAILURE POLICY
// ============================================================================

/// What an ingestion batch does when one event fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Stop at the first failure and leave every page untouched
    #[default]
    Abort,
    /// Drop the failing event, report it, keep going
    SkipAndContinue,
}

impl std::fmt::Display for BatchFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchFailurePolicy::Abort => write!(f, "abort"),
            BatchFailurePolicy::SkipAndContinue => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for BatchFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(BatchFailurePolicy::Abort),
            "skip" | "skip_and_continue" | "continue" => Ok(BatchFailurePolicy::SkipAndContinue),
            _ => Err(format!("Unknown batch failure policy: {}", s)),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
