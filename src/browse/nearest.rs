//! Great-circle distance and nearest-first ranking.

use crate::catalog::{Camera, GeoPoint};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Pair every camera with its distance from `origin`, nearest first.
/// Ties keep input order.
pub fn rank_by_distance<'a>(
    cameras: impl IntoIterator<Item = &'a Camera>,
    origin: GeoPoint,
) -> Vec<(&'a Camera, f64)> {
    let mut ranked: Vec<(&Camera, f64)> = cameras
        .into_iter()
        .map(|c| (c, haversine_km(origin, c.position())))
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero() {
        let p = GeoPoint::new(50.0, 14.0);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_prague_brno() {
        let prague = GeoPoint::new(50.0755, 14.4378);
        let brno = GeoPoint::new(49.1951, 16.6068);
        let d = haversine_km(prague, brno);
        assert!((d - 185.0).abs() < 3.0, "got {}", d);
    }

    #[test]
    fn test_rank_orders_ascending() {
        let cams = vec![
            Camera::new("far", "Far", 49.0, 18.0),
            Camera::new("near", "Near", 50.01, 14.01),
            Camera::new("mid", "Mid", 50.5, 15.0),
        ];

        let ranked = rank_by_distance(&cams, GeoPoint::new(50.0, 14.0));
        let ids: Vec<_> = ranked.iter().map(|(c, _)| c.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(ranked.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
