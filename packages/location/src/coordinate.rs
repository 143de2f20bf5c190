//! Literal `"lat,lng"` input.

use std::sync::LazyLock;

use food_map_poi_models::Coordinates;
use regex::Regex;

/// Regex for a `lat,lng` pair: optional sign, ASCII digits, optional
/// decimal part, a comma, optional whitespace, then the same again.
static COORDINATE_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?[0-9]+\.?[0-9]*),\s*([+-]?[0-9]+\.?[0-9]*)$").expect("valid regex")
});

/// Returns `true` if `input` (trimmed) is a literal coordinate pair.
#[must_use]
pub fn is_coordinate_pair(input: &str) -> bool {
    COORDINATE_PAIR_RE.is_match(input.trim())
}

/// Parses a literal coordinate pair; the first number is latitude.
///
/// Returns `None` when `input` is not a coordinate pair at all. A
/// component that matches the pattern but does not parse becomes `0`.
#[must_use]
pub fn parse_coordinate_pair(input: &str) -> Option<Coordinates> {
    let caps = COORDINATE_PAIR_RE.captures(input.trim())?;
    let component = |i: usize| caps.get(i).map_or(0.0, |m| parse_component(m.as_str()));
    Some(Coordinates::new(component(1), component(2)))
}

/// Malformed numbers become `0`.
fn parse_component(s: &str) -> f64 {
    s.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_values() {
        let c = parse_coordinate_pair("39.9042,116.4074").unwrap();
        assert!((c.lat - 39.9042).abs() < f64::EPSILON);
        assert!((c.lng - 116.4074).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_whitespace_signs_and_integers() {
        let c = parse_coordinate_pair("  -33.8688,   +151 ").unwrap();
        assert!((c.lat + 33.8688).abs() < f64::EPSILON);
        assert!((c.lng - 151.0).abs() < f64::EPSILON);

        let c = parse_coordinate_pair("40,-74").unwrap();
        assert!((c.lat - 40.0).abs() < f64::EPSILON);
        assert!((c.lng + 74.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trailing_decimal_point_parses() {
        let c = parse_coordinate_pair("39.,116.").unwrap();
        assert!((c.lat - 39.0).abs() < f64::EPSILON);
        assert!((c.lng - 116.0).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_pairs_still_parse() {
        let c = parse_coordinate_pair("123.0,200.0").unwrap();
        assert!(!c.is_valid());
    }

    #[test]
    fn malformed_component_defaults_to_zero() {
        assert!(parse_component("+-39.9").abs() < f64::EPSILON);
        assert!(parse_component("").abs() < f64::EPSILON);
        assert!((parse_component("+39.") - 39.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fullwidth_digits_are_not_a_pair() {
        assert!(!is_coordinate_pair("３９.９,１１６.４"));
        assert!(parse_coordinate_pair("３９.９,１１６.４").is_none());
        assert!(!is_coordinate_pair("٣٩.٩,١١٦.٤"));
    }

    #[test]
    fn rejects_non_pairs() {
        for input in [
            "Sunset Diner",
            "39.9",
            "39.9,",
            ",116.4",
            "39.9 116.4",
            "39.9,116.4,10",
            "lat 39.9, lng 116.4",
            "39.9 ,116.4",
            "",
        ] {
            assert!(!is_coordinate_pair(input), "{input:?} should not match");
            assert!(parse_coordinate_pair(input).is_none());
        }
    }
}
