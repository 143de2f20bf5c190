//! Per-provider API keys.
//!
//! Keys come from the environment variables named by each service's
//! `api_key_env`. A missing or empty variable leaves the provider
//! unconfigured.

use std::collections::BTreeMap;

use food_map_poi_models::ProviderId;

use crate::service_registry::{ProviderService, enabled_services};

/// API keys keyed by provider.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    keys: BTreeMap<ProviderId, String>,
}

impl Credentials {
    /// Reads keys for every enabled service from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&enabled_services(), |name| std::env::var(name).ok())
    }

    /// Reads keys for `services` through `lookup` (variable name → value).
    #[must_use]
    pub fn from_lookup(
        services: &[ProviderService],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut credentials = Self::default();
        for service in services {
            if let Some(key) = lookup(&service.api_key_env) {
                credentials.insert(service.id, key);
            }
        }
        credentials
    }

    /// Adds a key, returning `self` for chaining.
    #[must_use]
    pub fn with_key(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.insert(provider, key);
        self
    }

    /// Adds a key. Blank keys are ignored.
    pub fn insert(&mut self, provider: ProviderId, key: impl Into<String>) {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        self.keys.insert(provider, key.to_string());
    }

    /// Returns the key for `provider`, if any.
    #[must_use]
    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    /// Returns `true` if no provider has a key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Providers that have a key, in id order.
    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.keys.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_registry::all_services;

    #[test]
    fn lookup_reads_configured_variables() {
        let credentials = Credentials::from_lookup(&all_services(), |name| match name {
            "AMAP_API_KEY" => Some("amap-key".to_string()),
            "TENCENT_MAP_KEY" => Some("tencent-key".to_string()),
            _ => None,
        });

        assert_eq!(credentials.get(ProviderId::Amap), Some("amap-key"));
        assert_eq!(credentials.get(ProviderId::Baidu), None);
        assert_eq!(credentials.get(ProviderId::Tencent), Some("tencent-key"));
    }

    #[test]
    fn blank_keys_are_ignored() {
        let credentials = Credentials::from_lookup(&all_services(), |_| Some("  ".to_string()));
        assert!(credentials.is_empty());
    }

    #[test]
    fn keys_are_trimmed() {
        let credentials = Credentials::default().with_key(ProviderId::Baidu, " ak \n");
        assert_eq!(credentials.get(ProviderId::Baidu), Some("ak"));
        assert_eq!(
            credentials.providers().collect::<Vec<_>>(),
            vec![ProviderId::Baidu]
        );
    }
}
