//! Engine configuration.

use std::time::Duration;

use food_map_location::DegradedModePolicy;
use strum_macros::{AsRefStr, Display, EnumString};

/// Default budget for each provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Default per-axis tolerance, in degrees, for treating two same-named
/// records as one place (roughly 100 m).
pub const DEFAULT_DEDUP_TOLERANCE_DEGREES: f64 = 0.001;

/// Which record survives when two providers report the same place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MergePolicy {
    /// A strictly higher-rated incoming record replaces the kept one.
    #[default]
    HigherRatingReplaces,
    /// The first-seen record is always kept.
    KeepFirst,
}

/// Duplicate detection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupConfig {
    /// Maximum per-axis difference (exclusive) for a duplicate.
    pub tolerance_degrees: f64,
    /// Field survival rule on collision.
    pub policy: MergePolicy,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            tolerance_degrees: DEFAULT_DEDUP_TOLERANCE_DEGREES,
            policy: MergePolicy::default(),
        }
    }
}

/// Settings for an [`AggregationEngine`](crate::AggregationEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Budget for each provider call, including geocoding.
    pub provider_timeout: Duration,
    /// Duplicate detection.
    pub dedup: DedupConfig,
    /// What to do when the search location cannot be resolved.
    pub degraded_mode: DegradedModePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            dedup: DedupConfig::default(),
            degraded_mode: DegradedModePolicy::Strict,
        }
    }
}
