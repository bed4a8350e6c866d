//! Great-circle distance

use pharmaclock_domain::constants::EARTH_RADIUS_METERS;
use pharmaclock_domain::GeoPoint;

/// Haversine distance between two points, in meters.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    // Rounding can push `h` just past 1 for near-antipodal points.
    let h = ((dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Haversine distance rounded to the nearest whole meter.
///
/// Symmetric and zero for identical points. The largest possible result
/// (half the Earth's circumference) fits comfortably in a `u32`. A
/// non-finite coordinate yields `u32::MAX` so it can never land inside a
/// geofence.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate_distance(a: GeoPoint, b: GeoPoint) -> u32 {
    let meters = haversine_meters(a, b);
    if meters.is_finite() {
        meters.round() as u32
    } else {
        u32::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_are_zero() {
        for point in [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(52.5200, 13.4050),
            GeoPoint::new(-33.8688, 151.2093),
            GeoPoint::new(89.9, -179.9),
        ] {
            assert_eq!(calculate_distance(point, point), 0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (GeoPoint::new(40.7128, -74.0060), GeoPoint::new(34.0522, -118.2437)),
            (GeoPoint::new(51.5074, -0.1278), GeoPoint::new(48.8566, 2.3522)),
            (GeoPoint::new(-1.2921, 36.8219), GeoPoint::new(-1.2925, 36.8230)),
        ];
        for (a, b) in pairs {
            assert_eq!(calculate_distance(a, b), calculate_distance(b, a));
        }
    }

    #[test]
    fn test_hundredth_degree_latitude() {
        let a = GeoPoint::new(14.5995, 120.9842);
        let b = GeoPoint::new(14.6095, 120.9842);
        let d = calculate_distance(a, b);
        assert!((1105..=1115).contains(&d), "got {d}");
    }

    #[test]
    fn test_known_city_pair() {
        // London to Paris is roughly 343.5 km along the great circle
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);
        let d = calculate_distance(london, paris);
        assert!((343_000..=344_500).contains(&d), "got {d}");
    }

    #[test]
    fn test_non_finite_input_is_never_nearby() {
        assert_eq!(calculate_distance(GeoPoint::new(f64::NAN, 0.0), GeoPoint::ZERO), u32::MAX);
        assert_eq!(calculate_distance(GeoPoint::ZERO, GeoPoint::new(0.0, f64::INFINITY)), u32::MAX);
    }

    #[test]
    fn test_near_antipodal_points() {
        // Half the circumference is about 20,015 km; rounding must not
        // collapse these to zero.
        let mut lat = -89.0;
        while lat <= 89.0 {
            let a = GeoPoint::new(lat, 10.0);
            let b = GeoPoint::new(-lat, -170.0);
            let d = calculate_distance(a, b);
            assert!((20_000_000..=20_020_000).contains(&d), "lat {lat}: got {d}");
            lat += 0.37;
        }
    }
}
