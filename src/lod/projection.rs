use std::f64::consts::PI;

use crate::geo::{
    bisect, cartesian_to_geo, earth_distance, geo_to_cartesian, GeoPoint, EARTH_RADIUS_M,
};
use crate::lod::traversal::{BoundaryRenderer, LineKind};

/// Screen calibration for the pixel-error estimate: 800 px across a 90°
/// horizontal field of view.
const HORIZONTAL_FOV_RADIANS: f64 = 90.0 * PI / 180.0;
const HORIZONTAL_PIXELS: f64 = 800.0;

/// Subdivide while the estimated on-screen feature size exceeds this.
pub const ERROR_THRESHOLD_PIXELS: f64 = 1.0;

/// Pixels across one tile; boundary length / TILE_RESOLUTION is the size of
/// the smallest feature a tile can represent.
pub const TILE_RESOLUTION: f64 = 256.0;

const DEFAULT_MIN_LEVEL: u32 = 3;
const DEFAULT_MAX_LEVEL: u32 = 14;

/// On-screen pixels per (meter of feature / meter of distance).
#[inline(always)]
pub(crate) fn projection_constant() -> f64 {
    HORIZONTAL_PIXELS / (2.0 * (HORIZONTAL_FOV_RADIANS / 2.0).tan())
}

/// A quadtree cell as four corner points.
///
/// Vertex convention:
/// ```text
///        0------1
///        |      |
///        |      |
///        2------3
/// ```
pub type Quad = [GeoPoint; 4];

/// The five points produced by splitting a quad: edge midpoints and center.
#[derive(Clone, Copy, Debug)]
pub struct Subdivision {
    pub center: GeoPoint,
    pub top: GeoPoint,
    pub bottom: GeoPoint,
    pub left: GeoPoint,
    pub right: GeoPoint,
}

impl Subdivision {
    /// Assemble the four child quads. Child order:
    /// ```text
    ///        +------+------+
    ///        |  0   |  1   |
    ///        +------+------+
    ///        |  2   |  3   |
    ///        +------+------+
    /// ```
    /// Adjacent children share their boundary points exactly: each midpoint
    /// is computed once here and copied into every child that borders it.
    pub fn children(&self, q: &Quad) -> [Quad; 4] {
        [
            [q[0], self.top, self.left, self.center],
            [self.top, q[1], self.center, self.right],
            [self.left, self.center, q[2], self.bottom],
            [self.center, self.right, self.bottom, q[3]],
        ]
    }
}

/// Forward Mercator latitude transform: y = ln(tan(π/4 + lat/2)).
#[inline(always)]
pub fn mercator_lat_to_y(lat: f64) -> f64 {
    (PI / 4.0 + lat.to_radians() / 2.0).tan().ln()
}

/// Inverse Mercator latitude transform.
#[inline(always)]
pub fn mercator_y_to_lat(y: f64) -> f64 {
    (2.0 * y.exp().atan() - PI / 2.0).to_degrees()
}

/// A map projection's subdivision strategy.
///
/// Each variant supplies its own midpoint-splitting rule; view-distance and
/// feature-size estimation default to lat/lon-aligned math, which CubeCell
/// (whose quads are not aligned to the graticule) overrides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Straightforward mapping of lat/lon to x/y.
    PlateCarree,
    /// Conformal, but can't quite reach the poles.
    Mercator,
    /// Mercator with latitude linearly remapped from [0, 90] to
    /// [0, max_lat], covering the whole sphere at the cost of growing
    /// anisotropy near the poles.
    BentMercator { max_lat: f64 },
    /// Cube-map projection: quads are cube-face cells subdivided in 3D and
    /// reprojected to lat/lon.
    CubeCell,
}

impl Projection {
    /// Levels below this always subdivide.
    pub fn min_level(&self) -> u32 {
        match self {
            Projection::CubeCell => 0,
            _ => DEFAULT_MIN_LEVEL,
        }
    }

    /// Levels at or beyond this never subdivide. The cube map starts from
    /// six roots instead of one or two, so it recurses one level less for
    /// a comparable final subdivision.
    pub fn max_level(&self) -> u32 {
        match self {
            Projection::CubeCell => DEFAULT_MAX_LEVEL - 1,
            _ => DEFAULT_MAX_LEVEL,
        }
    }

    /// Split a quad into its five subdivision points.
    pub fn subdivide(&self, q: &Quad) -> Subdivision {
        match self {
            Projection::PlateCarree => {
                let mid_lon = (q[0].lon + q[1].lon) / 2.0;
                let mid_lat = (q[0].lat + q[2].lat) / 2.0;
                grid_subdivision(q, mid_lat, mid_lon)
            }
            Projection::Mercator => {
                let mid_lon = (q[0].lon + q[1].lon) / 2.0;
                // Split the y projection in half, not the latitude.
                let mid_y = (mercator_lat_to_y(q[0].lat) + mercator_lat_to_y(q[2].lat)) / 2.0;
                grid_subdivision(q, mercator_y_to_lat(mid_y), mid_lon)
            }
            Projection::BentMercator { max_lat } => {
                let mid_lon = (q[0].lon + q[1].lon) / 2.0;
                grid_subdivision(q, bent_split_lat(*max_lat, q[0].lat, q[2].lat), mid_lon)
            }
            Projection::CubeCell => {
                let v0 = geo_to_cartesian(q[0]);
                let v1 = geo_to_cartesian(q[1]);
                let v2 = geo_to_cartesian(q[2]);
                let v3 = geo_to_cartesian(q[3]);
                Subdivision {
                    center: cartesian_to_geo((v0 + v1 + v2 + v3) * 0.25),
                    top: cartesian_to_geo(bisect(v0, v1)),
                    bottom: cartesian_to_geo(bisect(v2, v3)),
                    left: cartesian_to_geo(bisect(v0, v2)),
                    right: cartesian_to_geo(bisect(v1, v3)),
                }
            }
        }
    }

    /// Approximate distance in meters from the camera's surface point to
    /// the nearest boundary of the quad.
    ///
    /// The default assumes edges aligned to lines of latitude/longitude and
    /// clamps the camera's coordinates into the quad's ranges, so a camera
    /// inside the quad collapses to itself and yields 0. An approximation,
    /// not a true nearest-point solve. CubeCell uses a circumscribed-circle
    /// estimate instead.
    pub fn view_distance(&self, q: &Quad, eye: GeoPoint) -> f64 {
        match self {
            Projection::CubeCell => {
                let a = geo_to_cartesian(q[0]);
                let b = geo_to_cartesian(q[1]);
                let c = geo_to_cartesian(q[2]);
                let d = geo_to_cartesian(q[3]);
                let center = (a + b + c + d) * 0.25;
                let radius = earth_distance(center, a);

                let dist = earth_distance(geo_to_cartesian(eye), center);
                (dist - radius).max(0.0)
            }
            _ => {
                let lat_lo = q[2].lat.min(q[0].lat);
                let lat_hi = q[2].lat.max(q[0].lat);
                let lon_lo = q[0].lon.min(q[1].lon);
                let lon_hi = q[0].lon.max(q[1].lon);

                let nearest = GeoPoint::new(
                    eye.lat.clamp(lat_lo, lat_hi),
                    eye.lon.clamp(lon_lo, lon_hi),
                );
                (geo_to_cartesian(eye) - geo_to_cartesian(nearest)).length()
            }
        }
    }

    /// Physical size in meters of the smallest feature a tile of this quad
    /// can represent: longest boundary / TILE_RESOLUTION.
    pub fn feature_size(&self, q: &Quad) -> f64 {
        match self {
            Projection::CubeCell => {
                let boundary = earth_distance(geo_to_cartesian(q[0]), geo_to_cartesian(q[1]));
                boundary / TILE_RESOLUTION
            }
            _ => {
                // Longitude degrees shrink with latitude; measure the
                // top/bottom boundary closest to the equator.
                let min_latitude = q[0].lat.abs().min(q[2].lat.abs());
                let lon_angle = (q[1].lon - q[0].lon).abs();
                let lon_boundary =
                    min_latitude.to_radians().cos() * lon_angle.to_radians() * EARTH_RADIUS_M;

                let lat_angle = (q[0].lat - q[2].lat).abs();
                let lat_boundary = lat_angle.to_radians() * EARTH_RADIUS_M;

                lon_boundary.max(lat_boundary) / TILE_RESOLUTION
            }
        }
    }

    /// Draw the four interior division edges of a freshly split quad.
    /// Lat/lon-aligned variants draw grid lines; cube edges are already
    /// short arcs and draw as plain geodesics.
    pub fn draw_divisions(&self, s: &Subdivision, out: &mut dyn BoundaryRenderer) {
        let kind = match self {
            Projection::CubeCell => LineKind::Geodesic,
            _ => LineKind::Grid,
        };
        out.draw_boundary_segment(s.top, s.center, kind);
        out.draw_boundary_segment(s.center, s.bottom, kind);
        out.draw_boundary_segment(s.left, s.center, kind);
        out.draw_boundary_segment(s.center, s.right, kind);
    }
}

fn grid_subdivision(q: &Quad, mid_lat: f64, mid_lon: f64) -> Subdivision {
    Subdivision {
        center: GeoPoint::new(mid_lat, mid_lon),
        top: GeoPoint::new(q[0].lat, mid_lon),
        bottom: GeoPoint::new(q[2].lat, mid_lon),
        left: GeoPoint::new(mid_lat, q[0].lon),
        right: GeoPoint::new(mid_lat, q[1].lon),
    }
}

/// Map [-90, 90] onto [-max_lat, max_lat].
#[inline(always)]
fn map_lat(max_lat: f64, lat: f64) -> f64 {
    (lat / 90.0) * max_lat
}

/// Map [-max_lat, max_lat] back onto [-90, 90], folded into range.
#[inline(always)]
fn inv_map_lat(max_lat: f64, lat: f64) -> f64 {
    ((lat / max_lat) * 90.0).clamp(-90.0, 90.0)
}

/// Mercator-split two latitudes in the bent (remapped) domain.
fn bent_split_lat(max_lat: f64, lat0: f64, lat1: f64) -> f64 {
    let y0 = mercator_lat_to_y(map_lat(max_lat, lat0));
    let y1 = mercator_lat_to_y(map_lat(max_lat, lat1));
    inv_map_lat(max_lat, mercator_y_to_lat((y0 + y1) / 2.0))
}
