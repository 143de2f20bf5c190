//! The aggregation pipeline.

use std::sync::Arc;

use food_map_location::{LocationResolver, classify};
use food_map_poi_models::{CanonicalPoi, ProviderId, SearchRequest, SearchStrategy};
use food_map_provider::{PoiProvider, ProviderError, RadiusQuery, RegionQuery, with_timeout};
use futures::future::join_all;

use crate::config::EngineConfig;
use crate::merge::merge_pois;
use crate::rank::{apply_filters, sort_pois};
use crate::{AggregationError, ConfigurationError};

type ProviderResult = (ProviderId, Result<Vec<CanonicalPoi>, ProviderError>);

/// Runs searches across a fixed set of providers.
pub struct AggregationEngine {
    providers: Vec<Arc<dyn PoiProvider>>,
    config: EngineConfig,
}

impl AggregationEngine {
    /// Creates an engine over `providers`, which should be in priority
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoProviders`] if `providers` is empty.
    pub fn new(
        providers: Vec<Arc<dyn PoiProvider>>,
        config: EngineConfig,
    ) -> Result<Self, ConfigurationError> {
        if providers.is_empty() {
            return Err(ConfigurationError::NoProviders);
        }
        Ok(Self { providers, config })
    }

    /// Configured provider ids, in priority order.
    #[must_use]
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Searches for food places matching `request`.
    ///
    /// The location is classified first: region names are text-searched,
    /// coordinates and addresses are resolved and radius-searched, and
    /// anything ambiguous tries the region path before falling back to the
    /// coordinate path. Results are merged across providers, ranked, then
    /// filtered.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError`] if no provider can take part, if every
    /// provider fails, or if the location cannot be resolved.
    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<CanonicalPoi>, AggregationError> {
        let participants = self.participants(&request.providers)?;
        let strategy = classify(&request.location);

        log::info!(
            "Searching '{}' ({strategy}) with {} provider(s)",
            request.location,
            participants.len()
        );

        let mut pois = match strategy {
            SearchStrategy::Region => self.search_region(&participants, request).await?,
            SearchStrategy::Coordinate => self.search_coordinate(&participants, request).await?,
            SearchStrategy::Mixed => match self.search_region(&participants, request).await {
                Ok(pois) if !pois.is_empty() => pois,
                Ok(_) => {
                    log::info!("Region search found nothing, trying coordinate search");
                    self.search_coordinate(&participants, request).await?
                }
                Err(e) => {
                    log::info!("Region search unavailable ({e}), trying coordinate search");
                    self.search_coordinate(&participants, request).await?
                }
            },
        };

        sort_pois(&mut pois);
        let pois = apply_filters(pois, request);
        log::info!("Returning {} place(s)", pois.len());
        Ok(pois)
    }

    /// The request's providers in request order, or every configured one.
    fn participants(
        &self,
        requested: &[ProviderId],
    ) -> Result<Vec<Arc<dyn PoiProvider>>, AggregationError> {
        if requested.is_empty() {
            return Ok(self.providers.clone());
        }

        let mut selected: Vec<Arc<dyn PoiProvider>> = Vec::new();
        for id in requested {
            if selected.iter().any(|p| p.id() == *id) {
                continue;
            }
            match self.providers.iter().find(|p| p.id() == *id) {
                Some(provider) => selected.push(Arc::clone(provider)),
                None => log::warn!("Requested provider {id} is not configured, ignoring"),
            }
        }

        if selected.is_empty() {
            let requested: Vec<String> = requested.iter().map(ToString::to_string).collect();
            return Err(AggregationError::NoEligibleProviders(format!(
                "none of the requested providers ({}) is configured",
                requested.join(", ")
            )));
        }
        Ok(selected)
    }

    async fn search_region(
        &self,
        participants: &[Arc<dyn PoiProvider>],
        request: &SearchRequest,
    ) -> Result<Vec<CanonicalPoi>, AggregationError> {
        let eligible: Vec<&Arc<dyn PoiProvider>> = participants
            .iter()
            .filter(|p| p.supports_region_search())
            .collect();
        if eligible.is_empty() {
            return Err(AggregationError::NoEligibleProviders(
                "no participating provider supports region search".to_string(),
            ));
        }

        let query = RegionQuery {
            region: request.location.trim(),
            keyword: &request.keyword,
            poi_type_code: request.poi_type_code.as_deref(),
            city_limit: request.city_limit,
        };
        let timeout = self.config.provider_timeout;

        let results = join_all(eligible.iter().map(|provider| async move {
            let result =
                with_timeout(provider.id(), timeout, provider.search_by_region_text(&query)).await;
            (provider.id(), result)
        }))
        .await;

        self.union_results(SearchStrategy::Region, results)
    }

    async fn search_coordinate(
        &self,
        participants: &[Arc<dyn PoiProvider>],
        request: &SearchRequest,
    ) -> Result<Vec<CanonicalPoi>, AggregationError> {
        let resolver =
            LocationResolver::new(participants.to_vec()).with_timeout(self.config.provider_timeout);
        let center = resolver
            .resolve_with_policy(&request.location, &self.config.degraded_mode)
            .await?;
        log::info!("Searching within {}m of {center}", request.radius_meters);

        let query = RadiusQuery {
            center,
            radius_meters: request.radius_meters,
            keyword: &request.keyword,
            poi_type_code: request.poi_type_code.as_deref(),
        };
        let timeout = self.config.provider_timeout;

        let results = join_all(participants.iter().map(|provider| async move {
            let result =
                with_timeout(provider.id(), timeout, provider.search_by_radius(&query)).await;
            (provider.id(), result)
        }))
        .await;

        self.union_results(SearchStrategy::Coordinate, results)
    }

    /// Unions successful provider results in provider order and merges
    /// duplicates. Failures are logged and contribute nothing.
    fn union_results(
        &self,
        strategy: SearchStrategy,
        results: Vec<ProviderResult>,
    ) -> Result<Vec<CanonicalPoi>, AggregationError> {
        let attempted = results.len();
        let mut succeeded = 0;
        let mut union = Vec::new();

        for (provider, result) in results {
            match result {
                Ok(pois) => {
                    log::debug!("{provider}: {} place(s)", pois.len());
                    succeeded += 1;
                    union.extend(pois);
                }
                Err(e) => log::warn!("{strategy} search via {provider} failed: {e}"),
            }
        }

        if succeeded == 0 {
            return Err(AggregationError::AllProvidersFailed {
                strategy,
                attempted,
            });
        }

        let total = union.len();
        let merged = merge_pois(union, &self.config.dedup);
        log::info!(
            "{succeeded}/{attempted} provider(s) returned {total} place(s), {} after merging",
            merged.len()
        );
        Ok(merged)
    }
}
