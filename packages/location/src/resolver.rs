//! Location resolution with provider fallback.

use std::sync::Arc;
use std::time::Duration;

use food_map_poi_models::Coordinates;
use food_map_provider::{PoiProvider, with_timeout};

use crate::coordinate::parse_coordinate_pair;
use crate::strategy::is_current_location;
use crate::{DegradedModePolicy, ResolutionError};

/// Default per-call budget for geocode and IP-location calls.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves raw location strings into coordinates.
///
/// Providers are consulted in the order given, which is expected to be
/// priority order.
pub struct LocationResolver {
    providers: Vec<Arc<dyn PoiProvider>>,
    timeout: Duration,
}

impl LocationResolver {
    /// Creates a resolver over `providers`.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn PoiProvider>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves `location`:
    ///
    /// 1. a literal `lat,lng` pair is parsed directly;
    /// 2. the current-location sentinel uses the first provider that
    ///    supports IP location;
    /// 3. anything else is geocoded by each provider in turn until one
    ///    succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if no provider can resolve `location`.
    pub async fn resolve(&self, location: &str) -> Result<Coordinates, ResolutionError> {
        if let Some(coordinates) = parse_coordinate_pair(location) {
            log::debug!("Parsed literal coordinates {coordinates}");
            return Ok(coordinates);
        }

        if is_current_location(location) {
            return self.ip_locate().await;
        }

        self.geocode(location.trim()).await
    }

    /// Resolves `location`, substituting the policy's fallback coordinates
    /// on failure.
    ///
    /// # Errors
    ///
    /// Returns the resolution error unchanged under
    /// [`DegradedModePolicy::Strict`].
    pub async fn resolve_with_policy(
        &self,
        location: &str,
        policy: &DegradedModePolicy,
    ) -> Result<Coordinates, ResolutionError> {
        policy.apply(self.resolve(location).await)
    }

    /// Locates the caller by network origin using the first provider that
    /// supports it. Other providers are not tried.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::IpLocateUnavailable`] if no provider
    /// supports IP location, or [`ResolutionError::IpLocateFailed`] if the
    /// chosen provider fails.
    pub async fn ip_locate(&self) -> Result<Coordinates, ResolutionError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.supports_ip_locate())
            .ok_or(ResolutionError::IpLocateUnavailable)?;

        log::info!("Locating by IP via {}", provider.id());
        with_timeout(provider.id(), self.timeout, provider.ip_locate())
            .await
            .map_err(|source| ResolutionError::IpLocateFailed {
                provider: provider.id(),
                source,
            })
    }

    /// Geocodes `address` with each provider in order. The first success
    /// wins; failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NoProviders`] with no providers, or
    /// [`ResolutionError::GeocodeFailed`] when every provider fails.
    pub async fn geocode(&self, address: &str) -> Result<Coordinates, ResolutionError> {
        if self.providers.is_empty() {
            return Err(ResolutionError::NoProviders {
                location: address.to_string(),
            });
        }

        for provider in &self.providers {
            match with_timeout(provider.id(), self.timeout, provider.geocode(address)).await {
                Ok(coordinates) => {
                    log::info!("Geocoded '{address}' via {} -> {coordinates}", provider.id());
                    return Ok(coordinates);
                }
                Err(e) => {
                    log::warn!("Geocoding '{address}' via {} failed: {e}", provider.id());
                }
            }
        }

        Err(ResolutionError::GeocodeFailed {
            address: address.to_string(),
            attempts: self.providers.len(),
        })
    }
}
