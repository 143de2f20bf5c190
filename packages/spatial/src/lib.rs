#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Distance math for POI ranking.
//!
//! Every provider-independent distance in the workspace goes through
//! [`blended_distance`]: a cheap local planar estimate that is accurate
//! at walking range, corrected toward the great-circle distance once the
//! estimate passes [`BLEND_THRESHOLD_METERS`].

use food_map_poi_models::Coordinates;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters per degree of latitude used by the planar estimate.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Planar estimates above this are averaged with the haversine distance.
pub const BLEND_THRESHOLD_METERS: f64 = 1000.0;

/// Converts degrees to radians.
#[must_use]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in meters between two points.
#[must_use]
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = to_radians(b.lat - a.lat);
    let d_lng = to_radians(b.lng - a.lng);
    let lat1 = to_radians(a.lat);
    let lat2 = to_radians(b.lat);

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Local equirectangular distance in meters between two points.
///
/// The longitude axis is scaled by the cosine of the mean latitude.
#[must_use]
pub fn planar_distance(a: Coordinates, b: Coordinates) -> f64 {
    let mean_lat = to_radians(f64::midpoint(a.lat, b.lat));
    let lat_meters = (b.lat - a.lat) * METERS_PER_DEGREE;
    let lng_meters = (b.lng - a.lng) * METERS_PER_DEGREE * mean_lat.cos();

    lat_meters.hypot(lng_meters)
}

/// Planar distance with a spherical correction past one kilometer.
///
/// Returns the planar estimate unchanged when it is at most
/// [`BLEND_THRESHOLD_METERS`]; otherwise the mean of the planar and
/// haversine distances.
#[must_use]
pub fn blended_distance(a: Coordinates, b: Coordinates) -> f64 {
    blend(planar_distance(a, b), || haversine_distance(a, b))
}

/// Applies the blending rule to an already-computed planar estimate.
///
/// `spherical` is only evaluated above the threshold.
fn blend(planar: f64, spherical: impl FnOnce() -> f64) -> f64 {
    if planar > BLEND_THRESHOLD_METERS {
        f64::midpoint(planar, spherical())
    } else {
        planar
    }
}
