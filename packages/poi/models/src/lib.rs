#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical types shared across the food map workspace.
//!
//! Every provider adapter normalizes its own response shape into a
//! [`CanonicalPoi`], and every search enters the engine as a
//! [`SearchRequest`]. These are request-scoped value types; nothing here
//! is cached between searches.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default search radius in meters.
pub const DEFAULT_RADIUS_METERS: u32 = 1000;

/// Default search keyword.
pub const DEFAULT_KEYWORD: &str = "food";

/// Cuisine label used when no vocabulary entry matches.
pub const CUISINE_OTHER: &str = "Other";

/// Fixed cuisine vocabulary, in match priority order.
///
/// Entries are the category terms the Chinese map providers report in
/// their `type`/`tag`/`category` fields. Earlier entries win when a
/// category string contains more than one (e.g. `"川菜;火锅"` is `火锅`).
pub const CUISINE_VOCABULARY: &[&str] = &[
    "火锅",
    "川菜",
    "湘菜",
    "粤菜",
    "东北菜",
    "西北菜",
    "江浙菜",
    "日本料理",
    "韩国料理",
    "西餐",
    "烧烤",
    "海鲜",
    "素食",
    "面馆",
    "快餐",
    "小吃",
    "咖啡",
    "甜品",
];

/// A WGS84-style latitude/longitude pair in degrees.
///
/// Range validity is not enforced on construction; see
/// [`Coordinates::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` if `lat ∈ [-90, 90]` and `lng ∈ [-180, 180]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns `true` if both axes differ from `other` by strictly less
    /// than `tolerance_degrees`.
    #[must_use]
    pub fn within(&self, other: &Self, tolerance_degrees: f64) -> bool {
        (self.lat - other.lat).abs() < tolerance_degrees
            && (self.lng - other.lng).abs() < tolerance_degrees
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Which mapping provider produced a record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProviderId {
    /// Amap (Gaode) web service API.
    Amap,
    /// Baidu Maps web service API.
    Baidu,
    /// Tencent location service API.
    Tencent,
}

impl ProviderId {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Amap, Self::Baidu, Self::Tencent]
    }
}

/// Coarse average-spend bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PriceBucket {
    /// Average spend below 30.
    Cheap,
    /// Average spend from 30 to 100 inclusive.
    Medium,
    /// Average spend above 100.
    Expensive,
    /// The provider reported no usable price.
    #[default]
    Unknown,
}

/// A normalized food establishment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPoi {
    /// Provider-prefixed identifier (e.g. `"amap:B000A83M61"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Street address as reported by the provider.
    pub address: String,
    /// Location of the place.
    pub location: Coordinates,
    /// Rating clamped into `[0, 5]`; `0` when unrated.
    pub rating: f64,
    /// Number of reviews, `0` when unknown.
    pub review_count: u32,
    /// Contact phone number(s).
    pub phone: String,
    /// Free-form opening hours.
    pub opening_hours: String,
    /// Average-spend bucket.
    pub price_bucket: PriceBucket,
    /// One of [`CUISINE_VOCABULARY`] or [`CUISINE_OTHER`].
    pub cuisine_type: String,
    /// Distance from the search center; `0` when there was no center.
    pub distance_meters: f64,
    /// First photo URL, empty when none.
    pub image_url: String,
    /// Every provider that reported this place.
    pub source_providers: BTreeSet<ProviderId>,
    /// Provider category tags, ordered and duplicate-free.
    pub tags: Vec<String>,
}

impl CanonicalPoi {
    /// Creates a record with the required identity fields and every other
    /// field empty/unknown.
    #[must_use]
    pub fn new(
        provider: ProviderId,
        native_id: &str,
        name: impl Into<String>,
        location: Coordinates,
    ) -> Self {
        Self {
            id: format!("{provider}:{native_id}"),
            name: name.into(),
            address: String::new(),
            location,
            rating: 0.0,
            review_count: 0,
            phone: String::new(),
            opening_hours: String::new(),
            price_bucket: PriceBucket::Unknown,
            cuisine_type: CUISINE_OTHER.to_string(),
            distance_meters: 0.0,
            image_url: String::new(),
            source_providers: BTreeSet::from([provider]),
            tags: Vec::new(),
        }
    }
}

/// How a raw location string will be searched.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchStrategy {
    /// Text search constrained to an administrative region.
    Region,
    /// Radius search around resolved coordinates.
    Coordinate,
    /// Region search first, radius search if that yields nothing.
    Mixed,
}

/// A fully-defaulted search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw user location: coordinate pair, address, region name, or the
    /// "current location" sentinel.
    pub location: String,
    /// Search radius for coordinate searches.
    pub radius_meters: u32,
    /// Provider search keyword.
    pub keyword: String,
    /// Keep only records of this cuisine (or tagged with it).
    pub cuisine_filter: Option<String>,
    /// Keep only records in this price bucket.
    pub price_filter: Option<PriceBucket>,
    /// Providers to query, in order. Empty means every configured one.
    pub providers: Vec<ProviderId>,
    /// Provider POI type code (e.g. Amap `050000`).
    pub poi_type_code: Option<String>,
    /// Restrict region searches to the named city.
    pub city_limit: bool,
    /// Drop records farther than this many meters.
    pub max_distance_meters: Option<f64>,
    /// Truncate the ranked list to this many records.
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Creates a request for `location` with every documented default.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            radius_meters: DEFAULT_RADIUS_METERS,
            keyword: DEFAULT_KEYWORD.to_string(),
            cuisine_filter: None,
            price_filter: None,
            providers: Vec::new(),
            poi_type_code: None,
            city_limit: false,
            max_distance_meters: None,
            limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn coordinates_validity_boundaries() {
        assert!(Coordinates::new(90.0, 180.0).is_valid());
        assert!(Coordinates::new(-90.0, -180.0).is_valid());
        assert!(!Coordinates::new(90.000_1, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn coordinates_within_is_strict() {
        let a = Coordinates::new(39.9, 116.4);
        assert!(a.within(&Coordinates::new(39.9005, 116.4005), 0.001));
        assert!(!a.within(&Coordinates::new(39.902, 116.4), 0.001));
        assert!(!a.within(&Coordinates::new(39.9, 116.402), 0.001));
    }

    #[test]
    fn provider_id_string_forms() {
        assert_eq!(ProviderId::Amap.to_string(), "amap");
        assert_eq!(ProviderId::from_str("Tencent").unwrap(), ProviderId::Tencent);
        assert!(ProviderId::from_str("google").is_err());
        assert_eq!(
            serde_json::to_string(&ProviderId::Baidu).unwrap(),
            "\"baidu\""
        );
    }

    #[test]
    fn price_bucket_parses_case_insensitively() {
        assert_eq!(PriceBucket::from_str("CHEAP").unwrap(), PriceBucket::Cheap);
        assert_eq!(PriceBucket::default(), PriceBucket::Unknown);
    }

    #[test]
    fn parse_errors_box_as_std_errors() {
        let err: Box<dyn std::error::Error + Send + Sync> =
            PriceBucket::from_str("pricey").unwrap_err().into();
        assert_eq!(err.to_string(), "Matching variant not found");

        let err: Box<dyn std::error::Error + Send + Sync> =
            ProviderId::from_str("google").unwrap_err().into();
        assert_eq!(err.to_string(), "Matching variant not found");
    }

    #[test]
    fn new_poi_is_prefixed_and_sourced() {
        let poi = CanonicalPoi::new(
            ProviderId::Amap,
            "B000A83M61",
            "Old Town Noodles",
            Coordinates::new(39.9, 116.4),
        );
        assert_eq!(poi.id, "amap:B000A83M61");
        assert_eq!(poi.cuisine_type, CUISINE_OTHER);
        assert_eq!(
            poi.source_providers.iter().copied().collect::<Vec<_>>(),
            vec![ProviderId::Amap]
        );
    }

    #[test]
    fn request_defaults() {
        let req = SearchRequest::new("39.9,116.4");
        assert_eq!(req.radius_meters, 1000);
        assert_eq!(req.keyword, "food");
        assert!(req.providers.is_empty());
        assert!(!req.city_limit);
    }
}
