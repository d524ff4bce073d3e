use std::f64::consts::PI;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in meters (6372.8 km)
pub const EARTH_R: f64 = 6_372_800.0;

use super::point::Point;

/// Calculates great-circle distance between two points using the haversine formula
///
/// See: <http://rosettacode.org/wiki/Haversine_formula>
///
/// # Returns
///
/// Distance in meters
pub fn haversine(p1: &Point, p2: &Point) -> f64 {
    let d_lat = (p2.lat - p1.lat) * DEGREE_RAD;
    let d_lon = (p2.lon - p1.lon) * DEGREE_RAD;
    let lat1 = p1.lat * DEGREE_RAD;
    let lat2 = p2.lat * DEGREE_RAD;

    let s_lat = (d_lat / 2.0).sin();
    let s_lon = (d_lon / 2.0).sin();
    // rounding can push a slightly past 1 for antipodal points
    let a = (s_lat * s_lat + lat1.cos() * lat2.cos() * s_lon * s_lon).min(1.0);

    2.0 * EARTH_R * a.sqrt().asin()
}
