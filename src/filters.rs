//! Radius filtering of tree records.
//!
//! Tags each record with its distance to a reference point and keeps
//! those within range. Input order is preserved; callers sort if they
//! want a by-distance listing.

use crate::geo::{haversine_distance, Point};
use crate::models::Tree;

/// Radius filter around a reference point.
#[derive(Debug, Clone, Copy)]
pub struct RadiusFilter {
    pub center: Point,
    pub radius_m: f64,
}

impl std::str::FromStr for RadiusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(format!(
                "radius filter requires 3 values (lat,lon,radius_m), got {}",
                parts.len()
            ));
        }

        let center: Point = format!("{},{}", parts[0], parts[1]).parse()?;
        let radius_m: f64 = parts[2]
            .trim()
            .parse()
            .map_err(|e| format!("invalid radius: {e}"))?;

        if radius_m <= 0.0 {
            return Err(format!("radius must be positive, got {radius_m}"));
        }

        Ok(Self { center, radius_m })
    }
}

/// A tree together with its computed distance to the reference point.
#[derive(Debug, Clone)]
pub struct TaggedTree {
    pub tree: Tree,
    /// Distance to the reference point in meters
    pub distance_m: f64,
}

impl RadiusFilter {
    /// Select the trees within range, each tagged with its distance.
    ///
    /// Records whose distance is not finite (missing or malformed
    /// coordinates) are excluded, never treated as in-range.
    #[must_use]
    pub fn filter_within(&self, trees: &[Tree]) -> Vec<TaggedTree> {
        trees
            .iter()
            .map(|tree| TaggedTree {
                tree: tree.clone(),
                distance_m: haversine_distance(
                    self.center.lat,
                    self.center.lon,
                    tree.latitude,
                    tree.longitude,
                ),
            })
            .filter(|t| t.distance_m.is_finite() && t.distance_m <= self.radius_m)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_at(id: i64, lat: f64, lon: f64) -> Tree {
        Tree {
            id,
            name: None,
            description: None,
            latitude: lat,
            longitude: lon,
            height: None,
            diameter: None,
            added_at: None,
        }
    }

    #[test]
    fn test_radius_parse() {
        let filter: RadiusFilter = "50.95306,5.352692,250".parse().unwrap();
        assert!((filter.center.lat - 50.95306).abs() < 1e-9);
        assert!((filter.radius_m - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_radius_parse_rejects_nonpositive() {
        assert!("50.0,5.0,0".parse::<RadiusFilter>().is_err());
        assert!("50.0,5.0,-10".parse::<RadiusFilter>().is_err());
        assert!("50.0,5.0".parse::<RadiusFilter>().is_err());
    }

    #[test]
    fn test_filter_includes_center_excludes_far() {
        let filter: RadiusFilter = "50.0,4.0,1000".parse().unwrap();
        let trees = vec![tree_at(1, 50.0, 4.0), tree_at(2, 51.0, 4.0)];

        let within = filter.filter_within(&trees);
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].tree.id, 1);
        // Coincident with the reference point
        assert!(within[0].distance_m.abs() < 1e-9);
    }

    #[test]
    fn test_filter_boundary_inclusive() {
        let filter: RadiusFilter = "50.0,4.0,120000".parse().unwrap();
        // ~111 km north, inside a 120 km radius
        let trees = vec![tree_at(1, 51.0, 4.0)];

        let within = filter.filter_within(&trees);
        assert_eq!(within.len(), 1);
        assert!(within[0].distance_m <= 120_000.0);
        assert!(within[0].distance_m > 110_000.0);
    }

    #[test]
    fn test_filter_excludes_nan_coordinates() {
        let filter: RadiusFilter = "50.0,4.0,1000000".parse().unwrap();
        let trees = vec![tree_at(1, f64::NAN, 4.0), tree_at(2, 50.0, 4.0)];

        let within = filter.filter_within(&trees);
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].tree.id, 2);
    }

    #[test]
    fn test_filter_preserves_input_order() {
        let filter: RadiusFilter = "50.0,4.0,200000".parse().unwrap();
        // Farther tree first; order must not change
        let trees = vec![tree_at(1, 51.0, 4.0), tree_at(2, 50.0, 4.0)];

        let within = filter.filter_within(&trees);
        let ids: Vec<i64> = within.iter().map(|t| t.tree.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
