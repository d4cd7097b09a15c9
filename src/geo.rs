use glam::DVec3;

/// Earth radius in meters. All Cartesian points derived from lat/lon live
/// on a sphere of this radius.
pub const EARTH_RADIUS_M: f64 = 6_378_100.0;

/// A surface point as (latitude, longitude) in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A camera fix: surface coordinates in degrees plus altitude in meters
/// (relative-to-ground convention). Altitude is reported by the view and
/// shown in the UI; the surface-distance heuristics work on `surface()`.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub lat: f64,
    pub lon: f64,
    pub alt_m: f64,
}

impl Camera {
    pub const fn new(lat: f64, lon: f64, alt_m: f64) -> Self {
        Self { lat, lon, alt_m }
    }

    /// The sub-camera point on the surface.
    pub const fn surface(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Convert a surface point to Earth-radius-scaled Cartesian coordinates.
/// Latitude is the polar angle: z = R·sin(lat), the equator lies in z = 0.
#[inline(always)]
pub fn geo_to_cartesian(p: GeoPoint) -> DVec3 {
    let (sin_lat, cos_lat) = p.lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = p.lon.to_radians().sin_cos();
    DVec3::new(
        EARTH_RADIUS_M * cos_lon * cos_lat,
        EARTH_RADIUS_M * sin_lon * cos_lat,
        EARTH_RADIUS_M * sin_lat,
    )
}

/// Recover (lat, lon) from a Cartesian point. The input need not be
/// normalized. Latitudes beyond 90° are folded back into range; longitude
/// is 0 at the poles where atan2 would be indeterminate.
pub fn cartesian_to_geo(v: DVec3) -> GeoPoint {
    let n = v.normalize();
    let mut lat = n.z.clamp(-1.0, 1.0).asin().to_degrees();
    if lat > 90.0 {
        lat -= 180.0;
    }
    let lon = if lat.abs() < 90.0 {
        n.y.atan2(n.x).to_degrees()
    } else {
        0.0
    };
    GeoPoint::new(lat, lon)
}

/// Midpoint of two Cartesian points.
#[inline(always)]
pub fn bisect(a: DVec3, b: DVec3) -> DVec3 {
    (a + b) * 0.5
}

/// Distance between two points along the surface of the Earth, assuming
/// both lie on (or project onto) the sphere.
#[inline(always)]
pub fn earth_distance(a: DVec3, b: DVec3) -> f64 {
    let dot = a.normalize().dot(b.normalize()).clamp(-1.0, 1.0);
    EARTH_RADIUS_M * dot.acos()
}

/// Signed perpendicular distance from `c` to the line through `a` and `b`.
/// Positive when `c` is to the left of the line as seen looking down at the
/// surface through `a`. Edges shorter than a meter yield 0 rather than a
/// division blow-up.
pub fn left_distance(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let ab = b - a;
    let ac = c - a;
    let cross = ab.cross(ac);

    let line_length = ab.length();
    if line_length < 1.0 {
        return 0.0;
    }
    let perpendicular = cross.length() / line_length;

    if a.dot(cross) > 0.0 {
        perpendicular
    } else {
        -perpendicular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() < eps, "{a} != {b} (eps {eps})");
    }

    #[test]
    fn test_cartesian_round_trip() {
        for &(lat, lon) in &[
            (0.0, 0.0),
            (45.0, 30.0),
            (-33.9, 151.2),
            (85.0, -180.0),
            (-85.0, 179.5),
        ] {
            let back = cartesian_to_geo(geo_to_cartesian(GeoPoint::new(lat, lon)));
            assert_close(back.lat, lat, 1e-9);
            assert_close(back.lon, lon, 1e-9);
        }
    }

    #[test]
    fn test_poles_have_zero_longitude() {
        let north = cartesian_to_geo(geo_to_cartesian(GeoPoint::new(90.0, 123.0)));
        assert_close(north.lat, 90.0, 1e-9);
        assert_eq!(north.lon, 0.0);

        let south = cartesian_to_geo(DVec3::new(0.0, 0.0, -EARTH_RADIUS_M));
        assert_close(south.lat, -90.0, 1e-9);
        assert_eq!(south.lon, 0.0);
    }

    #[test]
    fn test_cartesian_axes() {
        let v = geo_to_cartesian(GeoPoint::new(0.0, 0.0));
        assert_close(v.x, EARTH_RADIUS_M, 1e-3);
        assert_close(v.y, 0.0, 1e-3);
        assert_close(v.z, 0.0, 1e-3);

        let v = geo_to_cartesian(GeoPoint::new(0.0, 90.0));
        assert_close(v.y, EARTH_RADIUS_M, 1e-3);

        let v = geo_to_cartesian(GeoPoint::new(90.0, 0.0));
        assert_close(v.z, EARTH_RADIUS_M, 1e-3);
    }

    #[test]
    fn test_earth_distance_quarter_circle() {
        let a = geo_to_cartesian(GeoPoint::new(0.0, 0.0));
        let b = geo_to_cartesian(GeoPoint::new(0.0, 90.0));
        assert_close(
            earth_distance(a, b),
            EARTH_RADIUS_M * std::f64::consts::FRAC_PI_2,
            1.0,
        );
    }

    #[test]
    fn test_earth_distance_identical_points() {
        // A dot product drifting past 1.0 must not produce NaN.
        let a = geo_to_cartesian(GeoPoint::new(37.0, -122.0));
        assert_close(earth_distance(a, a), 0.0, 1e-6);
    }

    #[test]
    fn test_bisect_is_midpoint() {
        let m = bisect(DVec3::new(2.0, 0.0, 4.0), DVec3::new(0.0, 2.0, -4.0));
        assert_eq!(m, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_left_distance_sign() {
        let a = DVec3::new(EARTH_RADIUS_M, 0.0, 0.0);
        let b = DVec3::new(0.0, EARTH_RADIUS_M, 0.0);
        let above = DVec3::new(0.0, 0.0, EARTH_RADIUS_M);
        let below = DVec3::new(0.0, 0.0, -EARTH_RADIUS_M);

        let d = left_distance(a, b, above);
        assert!(d > 0.0);
        assert_close(left_distance(a, b, below), -d, 1e-6);
    }

    #[test]
    fn test_left_distance_degenerate_edge() {
        let a = DVec3::new(EARTH_RADIUS_M, 0.0, 0.0);
        let b = a + DVec3::new(0.1, 0.0, 0.0); // sub-meter edge
        let c = DVec3::new(0.0, EARTH_RADIUS_M, 0.0);
        assert_eq!(left_distance(a, b, c), 0.0);
    }
}
