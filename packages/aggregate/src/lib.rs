#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Multi-provider food place search.
//!
//! An [`AggregationEngine`] takes a [`SearchRequest`](food_map_poi_models::SearchRequest),
//! picks a strategy for its location, fans the query out to every
//! participating provider concurrently, and folds the answers into one
//! deduplicated, ranked, filtered list.
//!
//! ```text
//! location ─► classify ─┬─ Region ─────► region text search ─┐
//!                       ├─ Coordinate ─► resolve ─► radius ──┼─► merge ─► sort ─► filter
//!                       └─ Mixed ──────► region, else radius ┘
//! ```
//!
//! A provider that errors or times out is logged and skipped; the search
//! only fails when every provider it needed failed.

pub mod config;
pub mod engine;
pub mod merge;
pub mod rank;

use food_map_location::ResolutionError;
use food_map_poi_models::SearchStrategy;
use thiserror::Error;

pub use config::{DedupConfig, EngineConfig, MergePolicy};
pub use engine::AggregationEngine;
pub use merge::merge_pois;
pub use rank::{
    apply_filters, filter_by_cuisine, filter_by_max_distance, filter_by_price_bucket, sort_pois,
};

/// Errors from a search.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// No provider could take part in the search.
    #[error("No eligible providers: {0}")]
    NoEligibleProviders(String),

    /// Every provider asked failed or timed out.
    #[error("All {attempted} provider(s) failed during {strategy} search")]
    AllProvidersFailed {
        /// The search path that failed.
        strategy: SearchStrategy,
        /// How many providers were asked.
        attempted: usize,
    },

    /// The search location could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Errors building an engine.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The engine was given no providers.
    #[error("No map providers configured")]
    NoProviders,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = AggregationError::AllProvidersFailed {
            strategy: SearchStrategy::Region,
            attempted: 3,
        };
        assert_eq!(
            err.to_string(),
            "All 3 provider(s) failed during region search"
        );

        let err: AggregationError = ResolutionError::IpLocateUnavailable.into();
        assert_eq!(
            err.to_string(),
            "No configured provider supports IP location"
        );
    }
}
