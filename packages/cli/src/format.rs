//! Terminal and JSON rendering of search results.

use std::fmt::Write as _;

use food_map_poi_models::{CanonicalPoi, PriceBucket};

/// Renders results as a numbered list, one block per place.
#[must_use]
pub fn render_text(pois: &[CanonicalPoi]) -> String {
    if pois.is_empty() {
        return "No places found.\n".to_string();
    }

    let mut out = String::new();
    for (i, poi) in pois.iter().enumerate() {
        let sources: Vec<String> = poi.source_providers.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            out,
            "{:>2}. {}  {}  {}  [{}]",
            i + 1,
            poi.name,
            format_rating(poi.rating),
            format_distance(poi.distance_meters),
            sources.join(", ")
        );

        let details: Vec<String> = [
            Some(poi.cuisine_type.clone()),
            (poi.price_bucket != PriceBucket::Unknown).then(|| poi.price_bucket.to_string()),
            non_empty(&poi.address),
            non_empty(&poi.phone),
            non_empty(&poi.opening_hours),
        ]
        .into_iter()
        .flatten()
        .collect();
        let _ = writeln!(out, "    {}", details.join(" · "));
    }
    out
}

/// Renders results as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialization fails.
pub fn render_json(pois: &[CanonicalPoi]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(pois)
}

fn format_rating(rating: f64) -> String {
    if rating > 0.0 {
        format!("★{rating:.1}")
    } else {
        "unrated".to_string()
    }
}

fn format_distance(meters: f64) -> String {
    if meters <= 0.0 {
        "-".to_string()
    } else if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use food_map_poi_models::{Coordinates, ProviderId};

    fn noodles() -> CanonicalPoi {
        let mut poi = CanonicalPoi::new(
            ProviderId::Amap,
            "B0FF",
            "Old Town Noodles",
            Coordinates::new(39.9045, 116.407),
        );
        poi.source_providers.insert(ProviderId::Baidu);
        poi.rating = 4.2;
        poi.distance_meters = 37.4;
        poi.cuisine_type = "面馆".to_string();
        poi.price_bucket = PriceBucket::Cheap;
        poi.address = "东城区王府井大街1号".to_string();
        poi
    }

    #[test]
    fn text_lists_places() {
        let text = render_text(&[noodles()]);
        assert_eq!(
            text,
            " 1. Old Town Noodles  ★4.2  37 m  [amap, baidu]\n    面馆 · cheap · 东城区王府井大街1号\n"
        );
    }

    #[test]
    fn text_for_no_results() {
        assert_eq!(render_text(&[]), "No places found.\n");
    }

    #[test]
    fn distances_and_ratings() {
        assert_eq!(format_distance(0.0), "-");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1530.0), "1.5 km");
        assert_eq!(format_rating(0.0), "unrated");
    }

    #[test]
    fn json_round_trips_fields() {
        let json = render_json(&[noodles()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "amap:B0FF");
        assert_eq!(value[0]["price_bucket"], "cheap");
        assert_eq!(value[0]["source_providers"][1], "baidu");
    }
}
