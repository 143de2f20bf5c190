//! Ranking and result filters.

use food_map_poi_models::{CanonicalPoi, PriceBucket, SearchRequest};

/// Sorts by rating descending, then distance ascending. Stable, so
/// records equal on both keep their merge order.
pub fn sort_pois(pois: &mut [CanonicalPoi]) {
    pois.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| a.distance_meters.total_cmp(&b.distance_meters))
    });
}

/// Keeps records whose cuisine is exactly `cuisine` or that carry a tag
/// containing it.
#[must_use]
pub fn filter_by_cuisine(mut pois: Vec<CanonicalPoi>, cuisine: &str) -> Vec<CanonicalPoi> {
    pois.retain(|poi| poi.cuisine_type == cuisine || poi.tags.iter().any(|t| t.contains(cuisine)));
    pois
}

/// Keeps records in exactly `bucket`.
#[must_use]
pub fn filter_by_price_bucket(mut pois: Vec<CanonicalPoi>, bucket: PriceBucket) -> Vec<CanonicalPoi> {
    pois.retain(|poi| poi.price_bucket == bucket);
    pois
}

/// Keeps records at most `meters` from the search center.
#[must_use]
pub fn filter_by_max_distance(mut pois: Vec<CanonicalPoi>, meters: f64) -> Vec<CanonicalPoi> {
    pois.retain(|poi| poi.distance_meters <= meters);
    pois
}

/// Applies every filter `request` asks for, then its `limit`.
///
/// A blank cuisine filter is ignored.
#[must_use]
pub fn apply_filters(mut pois: Vec<CanonicalPoi>, request: &SearchRequest) -> Vec<CanonicalPoi> {
    if let Some(cuisine) = request
        .cuisine_filter
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        pois = filter_by_cuisine(pois, cuisine);
    }
    if let Some(bucket) = request.price_filter {
        pois = filter_by_price_bucket(pois, bucket);
    }
    if let Some(meters) = request.max_distance_meters {
        pois = filter_by_max_distance(pois, meters);
    }
    if let Some(limit) = request.limit {
        pois.truncate(limit);
    }
    pois
}
