#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns a raw user location into something searchable.
//!
//! [`classify`] decides how a location string will be searched, and
//! [`LocationResolver`] turns it into coordinates when a radius search is
//! needed. Nothing here caches: every search resolves afresh.

pub mod coordinate;
pub mod resolver;
pub mod strategy;

use food_map_poi_models::{Coordinates, ProviderId};
use food_map_provider::ProviderError;
use thiserror::Error;

pub use coordinate::{is_coordinate_pair, parse_coordinate_pair};
pub use resolver::LocationResolver;
pub use strategy::{classify, is_current_location};

/// Tiananmen Square, the historical stand-in for an unresolvable location.
pub const BEIJING: Coordinates = Coordinates::new(39.9042, 116.4074);

/// Errors from location resolution.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// No provider was available to geocode with.
    #[error("No providers available to resolve '{location}'")]
    NoProviders {
        /// The location that could not be resolved.
        location: String,
    },

    /// The current location was requested but no provider supports IP
    /// location.
    #[error("No configured provider supports IP location")]
    IpLocateUnavailable,

    /// The IP-location provider failed.
    #[error("IP location via {provider} failed: {source}")]
    IpLocateFailed {
        /// The provider that was asked.
        provider: ProviderId,
        /// Why it failed.
        #[source]
        source: ProviderError,
    },

    /// Every provider failed to geocode the address.
    #[error("Could not geocode '{address}' ({attempts} provider(s) tried)")]
    GeocodeFailed {
        /// The address that could not be geocoded.
        address: String,
        /// How many providers were tried.
        attempts: usize,
    },
}

/// What to do when a location cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DegradedModePolicy {
    /// Propagate the resolution error.
    #[default]
    Strict,
    /// Search around these coordinates instead.
    Fallback(Coordinates),
}

impl DegradedModePolicy {
    /// Falls back to [`BEIJING`].
    #[must_use]
    pub const fn beijing() -> Self {
        Self::Fallback(BEIJING)
    }

    /// Applies the policy to a resolution result.
    ///
    /// # Errors
    ///
    /// Returns the original error under [`DegradedModePolicy::Strict`].
    pub fn apply(
        &self,
        result: Result<Coordinates, ResolutionError>,
    ) -> Result<Coordinates, ResolutionError> {
        match (result, self) {
            (Ok(coordinates), _) => Ok(coordinates),
            (Err(e), Self::Strict) => Err(e),
            (Err(e), Self::Fallback(fallback)) => {
                log::warn!("{e}; searching around fallback {fallback} instead");
                Ok(*fallback)
            }
        }
    }
}
