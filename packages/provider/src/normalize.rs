//! Normalization from provider JSON into [`CanonicalPoi`] records.
//!
//! Providers disagree on almost everything: Amap sends numbers as
//! strings and empty fields as `[]`, Baidu nests rating and price under
//! `detail_info`, Tencent has neither. Each adapter supplies a
//! [`PoiNormalizer`] for its own shape; the field helpers here are shared.

use food_map_poi_models::{
    CUISINE_OTHER, CUISINE_VOCABULARY, CanonicalPoi, Coordinates, PriceBucket, ProviderId,
};
use food_map_spatial::blended_distance;
use serde_json::Value;

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Average spend below this is [`PriceBucket::Cheap`].
pub const CHEAP_BELOW: f64 = 30.0;

/// Average spend above this is [`PriceBucket::Expensive`].
pub const EXPENSIVE_ABOVE: f64 = 100.0;

/// Turns one provider's raw place objects into canonical records.
pub trait PoiNormalizer {
    /// Provider whose shape this understands.
    fn provider(&self) -> ProviderId;

    /// Normalizes one raw place. Returns `None` for places without a
    /// name or a parseable location.
    fn normalize(&self, raw: &Value) -> Option<CanonicalPoi>;

    /// Normalizes a list of raw places.
    ///
    /// With a `center`, `distance_meters` is computed by
    /// [`blended_distance`] regardless of what the provider reported;
    /// without one it is `0`.
    fn normalize_all(&self, raw: &[Value], center: Option<Coordinates>) -> Vec<CanonicalPoi> {
        let pois: Vec<CanonicalPoi> = raw
            .iter()
            .filter_map(|item| {
                let poi = self.normalize(item);
                if poi.is_none() {
                    log::debug!("{}: skipping unusable place: {item}", self.provider());
                }
                poi
            })
            .map(|mut poi| {
                poi.distance_meters = center.map_or(0.0, |c| blended_distance(c, poi.location));
                poi
            })
            .collect();

        log::debug!(
            "{}: normalized {}/{} places",
            self.provider(),
            pois.len(),
            raw.len()
        );
        pois
    }
}

/// Reads a textual field that may arrive as a string, a number, or an
/// array of strings (Amap's encoding of empty/multi-valued fields).
#[must_use]
pub fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(";"),
        _ => String::new(),
    }
}

/// Reads a finite number sent either as a JSON number or a numeric string.
#[must_use]
pub fn parse_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Reads an integer sent either as a JSON number or a numeric string.
#[must_use]
pub fn parse_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parses a rating, clamped into `[0, 5]`. Unusable input is `0`.
#[must_use]
pub fn parse_rating(value: Option<&Value>) -> f64 {
    parse_number(value).map_or(0.0, |r| r.clamp(0.0, MAX_RATING))
}

/// Parses an average-spend figure. Negative values are discarded.
#[must_use]
pub fn parse_cost(value: Option<&Value>) -> Option<f64> {
    parse_number(value).filter(|c| *c >= 0.0)
}

/// Parses a review count. Unusable input is `0`.
#[must_use]
pub fn parse_count(value: Option<&Value>) -> u32 {
    parse_number(value)
        .filter(|n| *n >= 0.0)
        .map_or(0, |n| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = n.min(f64::from(u32::MAX)) as u32;
            count
        })
}

/// Buckets an average spend: `< 30` cheap, `30..=100` medium, `> 100`
/// expensive, nothing reported unknown.
#[must_use]
pub fn parse_price_bucket(cost: Option<f64>) -> PriceBucket {
    match cost {
        None => PriceBucket::Unknown,
        Some(c) if c < CHEAP_BELOW => PriceBucket::Cheap,
        Some(c) if c <= EXPENSIVE_ABOVE => PriceBucket::Medium,
        Some(_) => PriceBucket::Expensive,
    }
}

/// Returns the first [`CUISINE_VOCABULARY`] entry contained in `text`,
/// or [`CUISINE_OTHER`].
#[must_use]
pub fn extract_cuisine_type(text: &str) -> String {
    CUISINE_VOCABULARY
        .iter()
        .find(|cuisine| text.contains(**cuisine))
        .copied()
        .unwrap_or(CUISINE_OTHER)
        .to_string()
}

/// Splits provider category strings (`"餐饮服务;中餐厅;火锅店"`,
/// `"美食:火锅"`) into an ordered duplicate-free tag list.
#[must_use]
pub fn split_tags<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for source in sources {
        for tag in source.split([';', ',', '|', ':']) {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

/// Parses a `"lng,lat"` string (Amap's location encoding).
#[must_use]
pub fn parse_lng_lat(text: &str) -> Option<Coordinates> {
    let (lng, lat) = text.split_once(',')?;
    let lng = lng.trim().parse::<f64>().ok()?;
    let lat = lat.trim().parse::<f64>().ok()?;
    Some(Coordinates::new(lat, lng))
}

/// Parses a `{"lat": .., "lng": ..}` object whose members may be numbers
/// or numeric strings.
#[must_use]
pub fn parse_lat_lng_object(value: Option<&Value>) -> Option<Coordinates> {
    let value = value?;
    let lat = parse_number(value.get("lat"))?;
    let lng = parse_number(value.get("lng"))?;
    Some(Coordinates::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_field_handles_provider_encodings() {
        assert_eq!(text_field(Some(&json!(" 朝阳路 "))), "朝阳路");
        assert_eq!(text_field(Some(&json!([]))), "");
        assert_eq!(text_field(Some(&json!(["010-1", "010-2"]))), "010-1;010-2");
        assert_eq!(text_field(Some(&json!(42))), "42");
        assert_eq!(text_field(None), "");
        assert_eq!(text_field(Some(&json!(null))), "");
    }

    #[test]
    fn rating_is_clamped() {
        assert!((parse_rating(Some(&json!("4.6"))) - 4.6).abs() < f64::EPSILON);
        assert!((parse_rating(Some(&json!(7.2))) - 5.0).abs() < f64::EPSILON);
        assert!(parse_rating(Some(&json!(-1))).abs() < f64::EPSILON);
        assert!(parse_rating(Some(&json!([]))).abs() < f64::EPSILON);
        assert!(parse_rating(Some(&json!("NaN"))).abs() < f64::EPSILON);
        assert!(parse_rating(None).abs() < f64::EPSILON);
    }

    #[test]
    fn price_bucket_thresholds() {
        assert_eq!(parse_price_bucket(None), PriceBucket::Unknown);
        assert_eq!(parse_price_bucket(Some(0.0)), PriceBucket::Cheap);
        assert_eq!(parse_price_bucket(Some(29.99)), PriceBucket::Cheap);
        assert_eq!(parse_price_bucket(Some(30.0)), PriceBucket::Medium);
        assert_eq!(parse_price_bucket(Some(100.0)), PriceBucket::Medium);
        assert_eq!(parse_price_bucket(Some(100.01)), PriceBucket::Expensive);
    }

    #[test]
    fn cost_rejects_garbage() {
        assert_eq!(parse_cost(Some(&json!("85.00"))), Some(85.0));
        assert_eq!(parse_cost(Some(&json!([]))), None);
        assert_eq!(parse_cost(Some(&json!(""))), None);
        assert_eq!(parse_cost(Some(&json!(-5))), None);
    }

    #[test]
    fn integer_accepts_numbers_and_strings() {
        assert_eq!(parse_integer(Some(&json!(0))), Some(0));
        assert_eq!(parse_integer(Some(&json!("311"))), Some(311));
        assert_eq!(parse_integer(Some(&json!(1.5))), None);
        assert_eq!(parse_integer(None), None);
    }

    #[test]
    fn count_parses_strings_and_saturates() {
        assert_eq!(parse_count(Some(&json!("120"))), 120);
        assert_eq!(parse_count(Some(&json!(1e12))), u32::MAX);
        assert_eq!(parse_count(Some(&json!("n/a"))), 0);
    }

    #[test]
    fn cuisine_first_vocabulary_match_wins() {
        assert_eq!(extract_cuisine_type("餐饮服务;中餐厅;火锅店"), "火锅");
        // 火锅 precedes 川菜 in the vocabulary.
        assert_eq!(extract_cuisine_type("川菜;火锅"), "火锅");
        assert_eq!(extract_cuisine_type("美食:川菜"), "川菜");
        assert_eq!(extract_cuisine_type("餐饮服务;中餐厅"), CUISINE_OTHER);
        assert_eq!(extract_cuisine_type(""), CUISINE_OTHER);
    }

    #[test]
    fn tags_are_split_and_deduplicated() {
        let tags = split_tags(["餐饮服务;中餐厅;火锅店", "火锅店,老字号", "美食:火锅"]);
        assert_eq!(
            tags,
            vec!["餐饮服务", "中餐厅", "火锅店", "老字号", "美食", "火锅"]
        );
        assert!(split_tags(["", " ; "]).is_empty());
    }

    #[test]
    fn lng_lat_string_order() {
        let c = parse_lng_lat("116.4074,39.9042").unwrap();
        assert!((c.lat - 39.9042).abs() < 1e-9);
        assert!((c.lng - 116.4074).abs() < 1e-9);
        assert!(parse_lng_lat("116.4").is_none());
        assert!(parse_lng_lat("a,b").is_none());
    }

    #[test]
    fn lat_lng_object_accepts_strings() {
        let c = parse_lat_lng_object(Some(&json!({"lat": "39.9", "lng": 116.4}))).unwrap();
        assert!((c.lat - 39.9).abs() < 1e-9);
        assert!((c.lng - 116.4).abs() < 1e-9);
        assert!(parse_lat_lng_object(Some(&json!({"lat": 1.0}))).is_none());
    }

    struct NameOnly;

    impl PoiNormalizer for NameOnly {
        fn provider(&self) -> ProviderId {
            ProviderId::Tencent
        }

        fn normalize(&self, raw: &Value) -> Option<CanonicalPoi> {
            let name = raw.get("name")?.as_str()?;
            let location = parse_lat_lng_object(raw.get("location"))?;
            Some(CanonicalPoi::new(self.provider(), name, name, location))
        }
    }

    #[test]
    fn normalize_all_overrides_distance_and_skips_unusable() {
        let raw = vec![
            json!({"name": "A", "location": {"lat": 39.9052, "lng": 116.4074}, "_distance": 5}),
            json!({"location": {"lat": 39.9, "lng": 116.4}}),
        ];
        let center = Coordinates::new(39.9042, 116.4074);

        let pois = NameOnly.normalize_all(&raw, Some(center));
        assert_eq!(pois.len(), 1);
        assert!((pois[0].distance_meters - 111.32).abs() < 0.01);

        let pois = NameOnly.normalize_all(&raw, None);
        assert!(pois[0].distance_meters.abs() < f64::EPSILON);
    }
}
