//! Geospatial filtering for located entities.
//!
//! Pure, order-preserving predicates over borrowed coordinates. Every entity
//! is classified independently; nothing here suspends, locks, or touches
//! storage.

use orgatlas_common::GeoPoint;

/// Anything exposing a resolved latitude/longitude pair. Organizations
/// implement this through their building's coordinates.
pub trait Located {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

impl Located for orgatlas_common::Organization {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Haversine great-circle distance between two lat/lon points in kilometers.
/// Spherical-earth approximation, not ellipsoidal.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Keep the entities within `radius_km` of `center` (inclusive), preserving
/// input order.
pub fn filter_by_radius<T: Located>(entities: Vec<T>, center: GeoPoint, radius_km: f64) -> Vec<T> {
    entities
        .into_iter()
        .filter(|e| haversine_km(center.lat, center.lon, e.latitude(), e.longitude()) <= radius_km)
        .collect()
}

/// Keep the entities inside the axis-aligned rectangle spanned by the
/// south-west and north-east corners (inclusive on all edges), preserving
/// input order. No wraparound across the ±180° longitude seam.
pub fn filter_by_bbox<T: Located>(entities: Vec<T>, sw: GeoPoint, ne: GeoPoint) -> Vec<T> {
    entities
        .into_iter()
        .filter(|e| {
            let (lat, lon) = (e.latitude(), e.longitude());
            sw.lat <= lat && lat <= ne.lat && sw.lon <= lon && lon <= ne.lon
        })
        .collect()
}

// ===========================================================================
// Unit tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: (f64, f64) = (55.7558, 37.6173);
    const SAINT_PETERSBURG: (f64, f64) = (59.9343, 30.3351);

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        name: &'static str,
        lat: f64,
        lon: f64,
    }

    impl Located for Point {
        fn latitude(&self) -> f64 {
            self.lat
        }

        fn longitude(&self) -> f64 {
            self.lon
        }
    }

    fn point(name: &'static str, (lat, lon): (f64, f64)) -> Point {
        Point { name, lat, lon }
    }

    #[test]
    fn moscow_to_saint_petersburg() {
        let d = haversine_km(MOSCOW.0, MOSCOW.1, SAINT_PETERSBURG.0, SAINT_PETERSBURG.1);
        assert!((d - 635.0).abs() < 10.0, "Expected ~635km, got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(MOSCOW.0, MOSCOW.1, SAINT_PETERSBURG.0, SAINT_PETERSBURG.1);
        let ba = haversine_km(SAINT_PETERSBURG.0, SAINT_PETERSBURG.1, MOSCOW.0, MOSCOW.1);
        assert!((ab - ba).abs() < 1e-9, "d(a,b)={ab} != d(b,a)={ba}");
    }

    #[test]
    fn self_distance_is_zero() {
        let d = haversine_km(MOSCOW.0, MOSCOW.1, MOSCOW.0, MOSCOW.1);
        assert!(d.abs() < 1e-9, "d(p,p) should be ~0, got {d}");
    }

    #[test]
    fn radius_includes_coincident_point_excludes_distant() {
        let entities = vec![point("moscow", MOSCOW), point("spb", SAINT_PETERSBURG)];
        let matched = filter_by_radius(entities, GeoPoint { lat: MOSCOW.0, lon: MOSCOW.1 }, 1.0);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "moscow");
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        // ~111km per degree of latitude; pick a radius just past the distance.
        let center = GeoPoint { lat: 55.0, lon: 37.0 };
        let near = point("near", (55.5, 37.0));
        let d = haversine_km(center.lat, center.lon, near.lat, near.lon);
        let matched = filter_by_radius(vec![near.clone()], center, d);
        assert_eq!(matched, vec![near], "entity exactly at the radius must match");
    }

    #[test]
    fn zero_radius_matches_only_the_coincident_point() {
        let entities = vec![point("center", MOSCOW), point("spb", SAINT_PETERSBURG)];
        let matched = filter_by_radius(entities, GeoPoint { lat: MOSCOW.0, lon: MOSCOW.1 }, 0.0);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "center");
    }

    #[test]
    fn bbox_includes_moscow_excludes_saint_petersburg() {
        let entities = vec![point("moscow", MOSCOW), point("spb", SAINT_PETERSBURG)];
        let matched = filter_by_bbox(
            entities,
            GeoPoint { lat: 55.0, lon: 37.0 },
            GeoPoint { lat: 56.0, lon: 38.0 },
        );
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "moscow");
    }

    #[test]
    fn bbox_edges_are_inclusive() {
        let sw = GeoPoint { lat: 55.0, lon: 37.0 };
        let ne = GeoPoint { lat: 56.0, lon: 38.0 };
        let entities = vec![point("sw-corner", (55.0, 37.0)), point("ne-corner", (56.0, 38.0))];
        let matched = filter_by_bbox(entities, sw, ne);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn filters_preserve_input_order() {
        let entities = vec![
            point("a", (55.70, 37.60)),
            point("far", SAINT_PETERSBURG),
            point("b", (55.76, 37.62)),
            point("c", (55.80, 37.65)),
        ];

        let by_radius = filter_by_radius(
            entities.clone(),
            GeoPoint { lat: MOSCOW.0, lon: MOSCOW.1 },
            20.0,
        );
        let names: Vec<&str> = by_radius.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let by_bbox = filter_by_bbox(
            entities,
            GeoPoint { lat: 55.0, lon: 37.0 },
            GeoPoint { lat: 56.0, lon: 38.0 },
        );
        let names: Vec<&str> = by_bbox.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let none: Vec<Point> = Vec::new();
        assert!(filter_by_radius(none.clone(), GeoPoint { lat: 0.0, lon: 0.0 }, 100.0).is_empty());
        assert!(filter_by_bbox(
            none,
            GeoPoint { lat: -1.0, lon: -1.0 },
            GeoPoint { lat: 1.0, lon: 1.0 }
        )
        .is_empty());
    }
}
