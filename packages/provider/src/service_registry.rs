//! Compile-time registry of map provider service configurations.
//!
//! Each provider is defined in a TOML file under `services/`. The
//! registry embeds these at compile time and exposes them via
//! [`all_services`] and [`enabled_services`].

use std::time::Duration;

use food_map_poi_models::ProviderId;
use serde::Deserialize;

/// A map provider service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderService {
    /// Which provider this service talks to.
    pub id: ProviderId,
    /// Human-readable name.
    pub name: String,
    /// Whether this service participates in searches.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Geocoding and fan-out order; lower values run first.
    pub priority: u32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Whether region/text search is offered to the engine.
    #[serde(default = "default_true")]
    pub region_search: bool,
    /// Whether IP-based location is offered to the resolver.
    #[serde(default = "default_true")]
    pub ip_locate: bool,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Amap (Gaode) web service API.
    Amap {
        /// API base URL (e.g., `"https://restapi.amap.com"`).
        base_url: String,
        /// POI type code used when a request names none.
        default_type_code: String,
        /// Results per page (`offset`).
        #[serde(default = "default_page_size")]
        page_size: u32,
    },
    /// Baidu Maps web service API.
    Baidu {
        /// API base URL (e.g., `"https://api.map.baidu.com"`).
        base_url: String,
        /// Place category tag (e.g., `"美食"`).
        default_tag: String,
        /// Results per page.
        #[serde(default = "default_page_size")]
        page_size: u32,
    },
    /// Tencent location service API.
    Tencent {
        /// API base URL (e.g., `"https://apis.map.qq.com"`).
        base_url: String,
        /// Place category filter (e.g., `"美食"`).
        default_category: String,
        /// Results per page.
        #[serde(default = "default_page_size")]
        page_size: u32,
    },
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_page_size() -> u32 {
    20
}

impl ProviderService {
    /// Returns the provider's base URL regardless of variant.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Amap { base_url, .. }
            | ProviderConfig::Baidu { base_url, .. }
            | ProviderConfig::Tencent { base_url, .. } => base_url,
        }
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("amap", include_str!("../services/amap.toml")),
    ("baidu", include_str!("../services/baidu.toml")),
    ("tencent", include_str!("../services/tencent.toml")),
];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 3;

/// Returns all provider service configurations (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<ProviderService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse provider service '{name}': {e}"))
        })
        .collect()
}

/// Returns only enabled services, sorted by priority (ascending).
#[must_use]
pub fn enabled_services() -> Vec<ProviderService> {
    let mut services: Vec<ProviderService> =
        all_services().into_iter().filter(|s| s.enabled).collect();
    services.sort_by_key(|s| s.priority);
    services
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_services() {
        let services = all_services();
        assert_eq!(services.len(), EXPECTED_SERVICE_COUNT);
    }

    #[test]
    fn service_ids_are_unique() {
        let services = all_services();
        let mut seen = BTreeSet::new();
        for svc in &services {
            assert!(seen.insert(svc.id), "Duplicate service ID: {}", svc.id);
        }
    }

    #[test]
    fn all_services_have_required_fields() {
        for svc in &all_services() {
            assert!(!svc.name.is_empty(), "Service {} has empty name", svc.id);
            assert!(
                !svc.api_key_env.is_empty(),
                "Service {} has empty api_key_env",
                svc.id
            );
            assert!(
                svc.base_url().starts_with("https://"),
                "Service {} has non-https base_url",
                svc.id
            );
            assert!(svc.timeout_ms > 0, "Service {} has zero timeout", svc.id);
        }
    }

    #[test]
    fn config_variant_matches_id() {
        for svc in &all_services() {
            let matches = matches!(
                (svc.id, &svc.provider),
                (ProviderId::Amap, ProviderConfig::Amap { .. })
                    | (ProviderId::Baidu, ProviderConfig::Baidu { .. })
                    | (ProviderId::Tencent, ProviderConfig::Tencent { .. })
            );
            assert!(matches, "Service {} has mismatched provider config", svc.id);
        }
    }

    #[test]
    fn enabled_services_sorted_by_priority() {
        let services = enabled_services();
        for window in services.windows(2) {
            assert!(
                window[0].priority <= window[1].priority,
                "Services not sorted by priority: {} ({}) > {} ({})",
                window[0].id,
                window[0].priority,
                window[1].id,
                window[1].priority
            );
        }
    }
}
