//! Great-circle distance math.
//!
//! Distances are in meters; coordinates in decimal degrees.

use std::f64::consts::PI;

/// Earth radius in kilometers for haversine calculations.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl std::str::FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(format!("point requires 2 values (lat,lon), got {}", parts.len()));
        }

        let vals: Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse::<f64>()).collect();
        let vals = vals.map_err(|e| format!("invalid number in point: {e}"))?;

        let point = Self {
            lat: vals[0],
            lon: vals[1],
        };

        // Validate ranges
        if point.lat < -90.0 || point.lat > 90.0 {
            return Err(format!("latitude {} out of range [-90, 90]", point.lat));
        }
        if point.lon < -180.0 || point.lon > 180.0 {
            return Err(format!("longitude {} out of range [-180, 180]", point.lon));
        }

        Ok(point)
    }
}

/// Calculate the great-circle distance between two points using the haversine formula.
///
/// Returns distance in meters. Non-finite inputs propagate as NaN; the
/// radius filter treats NaN as out of range.
#[must_use]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * PI / 180.0;
    let lat2_rad = lat2 * PI / 180.0;
    let delta_lat = (lat2 - lat1) * PI / 180.0;
    let delta_lon = (lon2 - lon1) * PI / 180.0;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}
