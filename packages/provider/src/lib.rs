#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map provider adapters for the food map.
//!
//! Each adapter implements [`PoiProvider`] against one provider's REST
//! API and normalizes its response shape into
//! [`CanonicalPoi`](food_map_poi_models::CanonicalPoi) records via a
//! [`normalize::PoiNormalizer`]:
//!
//! 1. **Amap** (priority 1): geocoding, IP location, around and text
//!    place search.
//! 2. **Baidu** (priority 2): geocoding, IP location, place search
//!    (results requested in GCJ-02 to line up with the other providers).
//! 3. **Tencent** (priority 3): geocoding, IP location, nearby and
//!    region place search.
//!
//! Providers are loaded from the [`service_registry`] and built by
//! [`configured_providers`] in priority order. A provider without an API
//! key is left out rather than treated as an error.

pub mod amap;
pub mod baidu;
pub mod credentials;
mod http;
pub mod normalize;
pub mod service_registry;
pub mod tencent;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use food_map_poi_models::{CanonicalPoi, Coordinates, ProviderId};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

pub use credentials::Credentials;
pub use service_registry::{ProviderConfig, ProviderService};

/// An optional provider capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// IP-based coarse location.
    IpLocate,
    /// Region/text place search without a center.
    RegionSearch,
}

/// Errors from a single provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{provider} returned status {code}: {message}")]
    Status {
        /// Which provider failed.
        provider: ProviderId,
        /// Provider or HTTP status code.
        code: String,
        /// Provider-supplied message.
        message: String,
    },

    /// The provider answered successfully but with nothing usable.
    #[error("{provider} returned no results for '{query}'")]
    NoResults {
        /// Which provider failed.
        provider: ProviderId,
        /// What was asked.
        query: String,
    },

    /// Response parsing failed.
    #[error("{provider} parse error: {message}")]
    Parse {
        /// Which provider failed.
        provider: ProviderId,
        /// Description of the parsing failure.
        message: String,
    },

    /// The provider does not offer (or is not configured for) a capability.
    #[error("{provider} does not support {capability}")]
    Unsupported {
        /// Which provider was asked.
        provider: ProviderId,
        /// The missing capability.
        capability: Capability,
    },

    /// The call did not complete in time.
    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout {
        /// Which provider timed out.
        provider: ProviderId,
        /// The exceeded budget.
        timeout_ms: u64,
    },
}

/// A radius search around a center point.
#[derive(Debug, Clone, Copy)]
pub struct RadiusQuery<'a> {
    /// Search center.
    pub center: Coordinates,
    /// Search radius in meters.
    pub radius_meters: u32,
    /// Search keyword.
    pub keyword: &'a str,
    /// Provider POI type code, if the caller has one.
    pub poi_type_code: Option<&'a str>,
}

/// A text search constrained to a named region.
#[derive(Debug, Clone, Copy)]
pub struct RegionQuery<'a> {
    /// Region name (city, district, ...).
    pub region: &'a str,
    /// Search keyword.
    pub keyword: &'a str,
    /// Provider POI type code, if the caller has one.
    pub poi_type_code: Option<&'a str>,
    /// Whether results must stay inside the region.
    pub city_limit: bool,
}

/// A map provider offering geocoding and POI search.
#[async_trait::async_trait]
pub trait PoiProvider: Send + Sync {
    /// Which provider this is.
    fn id(&self) -> ProviderId;

    /// Whether [`PoiProvider::ip_locate`] is available.
    fn supports_ip_locate(&self) -> bool {
        false
    }

    /// Whether [`PoiProvider::search_by_region_text`] is available.
    fn supports_region_search(&self) -> bool {
        false
    }

    /// Geocodes a free-text address or place name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on a non-success status or zero results.
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError>;

    /// Resolves a coarse location from the caller's network origin.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the provider cannot return a usable
    /// location, or [`ProviderError::Unsupported`] by default.
    async fn ip_locate(&self) -> Result<Coordinates, ProviderError> {
        Err(ProviderError::Unsupported {
            provider: self.id(),
            capability: Capability::IpLocate,
        })
    }

    /// Searches places around a center. Every returned record's
    /// `distance_meters` is measured from `query.center`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on a non-success status.
    async fn search_by_radius(
        &self,
        query: &RadiusQuery<'_>,
    ) -> Result<Vec<CanonicalPoi>, ProviderError>;

    /// Searches places by text within a region.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on a non-success status, or
    /// [`ProviderError::Unsupported`] by default.
    async fn search_by_region_text(
        &self,
        _query: &RegionQuery<'_>,
    ) -> Result<Vec<CanonicalPoi>, ProviderError> {
        Err(ProviderError::Unsupported {
            provider: self.id(),
            capability: Capability::RegionSearch,
        })
    }
}

/// Bounds a provider call by `timeout`, turning expiry into
/// [`ProviderError::Timeout`].
///
/// # Errors
///
/// Returns the call's own error, or [`ProviderError::Timeout`].
pub async fn with_timeout<T, F>(
    provider: ProviderId,
    timeout: Duration,
    call: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>> + Send,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| {
            Err(ProviderError::Timeout {
                provider,
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })
        })
}

/// Builds one adapter for `service` using `api_key`.
#[must_use]
pub fn build_provider(
    service: &ProviderService,
    api_key: &str,
    client: &reqwest::Client,
) -> Arc<dyn PoiProvider> {
    match &service.provider {
        ProviderConfig::Amap {
            base_url,
            default_type_code,
            page_size,
        } => Arc::new(amap::AmapProvider {
            client: client.clone(),
            api_key: api_key.to_string(),
            base_url: base_url.clone(),
            timeout: service.timeout(),
            region_search: service.region_search,
            ip_locate: service.ip_locate,
            default_type_code: default_type_code.clone(),
            page_size: *page_size,
        }),
        ProviderConfig::Baidu {
            base_url,
            default_tag,
            page_size,
        } => Arc::new(baidu::BaiduProvider {
            client: client.clone(),
            api_key: api_key.to_string(),
            base_url: base_url.clone(),
            timeout: service.timeout(),
            region_search: service.region_search,
            ip_locate: service.ip_locate,
            default_tag: default_tag.clone(),
            page_size: *page_size,
        }),
        ProviderConfig::Tencent {
            base_url,
            default_category,
            page_size,
        } => Arc::new(tencent::TencentProvider {
            client: client.clone(),
            api_key: api_key.to_string(),
            base_url: base_url.clone(),
            timeout: service.timeout(),
            region_search: service.region_search,
            ip_locate: service.ip_locate,
            default_category: default_category.clone(),
            page_size: *page_size,
        }),
    }
}

/// Builds adapters for every enabled service that has a credential, in
/// priority order.
#[must_use]
pub fn configured_providers(
    credentials: &Credentials,
    client: &reqwest::Client,
) -> Vec<Arc<dyn PoiProvider>> {
    let mut providers = Vec::new();

    for service in service_registry::enabled_services() {
        let Some(api_key) = credentials.get(service.id) else {
            log::info!(
                "No API key for {} (set {}), skipping",
                service.name,
                service.api_key_env
            );
            continue;
        };
        log::debug!("Configured provider {} ({})", service.id, service.name);
        providers.push(build_provider(&service, api_key, client));
    }

    providers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_providers_skips_missing_keys() {
        let client = reqwest::Client::new();
        let credentials = Credentials::default().with_key(ProviderId::Tencent, "tk");
        let providers = configured_providers(&credentials, &client);
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id(), ProviderId::Tencent);
    }

    #[test]
    fn configured_providers_follow_priority() {
        let client = reqwest::Client::new();
        let credentials = Credentials::default()
            .with_key(ProviderId::Tencent, "tk")
            .with_key(ProviderId::Amap, "ak");
        let ids: Vec<ProviderId> = configured_providers(&credentials, &client)
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(ids, vec![ProviderId::Amap, ProviderId::Tencent]);
    }

    #[test]
    fn no_credentials_means_no_providers() {
        let client = reqwest::Client::new();
        assert!(configured_providers(&Credentials::default(), &client).is_empty());
    }

    #[tokio::test]
    async fn with_timeout_reports_expiry() {
        let result: Result<(), ProviderError> = with_timeout(
            ProviderId::Baidu,
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ProviderError::Timeout {
                provider: ProviderId::Baidu,
                timeout_ms: 10
            })
        ));
    }

    #[tokio::test]
    async fn with_timeout_passes_through_result() {
        let result = with_timeout(ProviderId::Amap, Duration::from_secs(1), async {
            Ok::<_, ProviderError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }
}
