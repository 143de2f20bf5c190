//! Search strategy selection from a raw location string.

use food_map_poi_models::SearchStrategy;

use crate::coordinate::is_coordinate_pair;

/// English spelling of the "use my location" sentinel, matched
/// case-insensitively.
pub const CURRENT_LOCATION: &str = "current location";

/// Chinese spelling of the "use my location" sentinel.
pub const CURRENT_LOCATION_ZH: &str = "当前位置";

/// Administrative-unit markers matched as substrings.
const CJK_REGION_MARKERS: &[&str] = &[
    "特别行政区",
    "自治区",
    "自治州",
    "市",
    "县",
    "区",
    "省",
    "盟",
    "旗",
];

/// Administrative-unit words matched case-insensitively as whole words.
const ENGLISH_REGION_WORDS: &[&str] = &["city", "county", "district", "province", "prefecture", "sar"];

/// Multi-word administrative phrases, matched case-insensitively on word
/// boundaries.
const ENGLISH_REGION_PHRASES: &[&[&str]] = &[
    &["autonomous", "region"],
    &["special", "administrative", "region"],
];

/// Returns `true` if `location` asks for the caller's own position.
#[must_use]
pub fn is_current_location(location: &str) -> bool {
    let location = location.trim();
    location.eq_ignore_ascii_case(CURRENT_LOCATION) || location == CURRENT_LOCATION_ZH
}

/// Returns `true` if `location` names an administrative unit.
#[must_use]
pub fn has_region_marker(location: &str) -> bool {
    if CJK_REGION_MARKERS.iter().any(|m| location.contains(m)) {
        return true;
    }

    let lower = location.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    words.iter().any(|w| ENGLISH_REGION_WORDS.contains(w))
        || ENGLISH_REGION_PHRASES
            .iter()
            .any(|phrase| words.windows(phrase.len()).any(|window| window == *phrase))
}

/// Picks the search strategy for `location`.
///
/// Coordinate pairs and the current-location sentinel are checked first,
/// then administrative-unit markers; anything else is [`SearchStrategy::Mixed`].
#[must_use]
pub fn classify(location: &str) -> SearchStrategy {
    if is_coordinate_pair(location) || is_current_location(location) {
        SearchStrategy::Coordinate
    } else if has_region_marker(location) {
        SearchStrategy::Region
    } else {
        SearchStrategy::Mixed
    }
}
