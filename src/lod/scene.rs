use glam::DVec3;

use crate::geo::{cartesian_to_geo, Camera, GeoPoint};
use crate::lod::projection::{Projection, Quad};
use crate::lod::traversal::{display_node, BoundaryRenderer, LineKind, TraversalContext};

/// Mercator tiling stops short of the poles.
const MERCATOR_MAX_LAT: f64 = 85.0;
/// Bent Mercator maps the full [0, 90] range onto [0, 85].
const BENT_MERCATOR_MAPPED_LAT: f64 = 85.0;

/// The projection modes the application can display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionKind {
    PlateCarree,
    Mercator,
    BentMercator,
    CubeCell,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 4] = [
        ProjectionKind::PlateCarree,
        ProjectionKind::Mercator,
        ProjectionKind::BentMercator,
        ProjectionKind::CubeCell,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectionKind::PlateCarree => "Plate-Carree",
            ProjectionKind::Mercator => "Mercator",
            ProjectionKind::BentMercator => "Bent Mercator",
            ProjectionKind::CubeCell => "Cube Map",
        }
    }

    /// The next mode in display order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            ProjectionKind::PlateCarree => ProjectionKind::Mercator,
            ProjectionKind::Mercator => ProjectionKind::BentMercator,
            ProjectionKind::BentMercator => ProjectionKind::CubeCell,
            ProjectionKind::CubeCell => ProjectionKind::PlateCarree,
        }
    }

    /// Build the scene for this mode and traverse it against `camera`,
    /// reporting boundary lines to `out`.
    pub fn run(&self, camera: Camera, out: &mut dyn BoundaryRenderer) -> TraversalContext {
        match self {
            ProjectionKind::PlateCarree => run_plate_carree(camera, out),
            ProjectionKind::Mercator => run_mercator(camera, out),
            ProjectionKind::BentMercator => run_bent_mercator(camera, out),
            ProjectionKind::CubeCell => run_cube_cell(camera, out),
        }
    }
}

/// Two root quads, one per hemisphere, split at the prime meridian and the
/// antimeridian.
pub fn run_plate_carree(camera: Camera, out: &mut dyn BoundaryRenderer) -> TraversalContext {
    let proj = Projection::PlateCarree;
    let mut ctx = TraversalContext::for_projection(&proj);
    let eye = camera.surface();

    draw_meridian_seam(out, -180.0);
    draw_meridian_seam(out, 0.0);

    let west: Quad = [
        GeoPoint::new(90.0, -180.0),
        GeoPoint::new(90.0, 0.0),
        GeoPoint::new(-90.0, -180.0),
        GeoPoint::new(-90.0, 0.0),
    ];
    let east: Quad = [
        GeoPoint::new(90.0, 0.0),
        GeoPoint::new(90.0, 180.0),
        GeoPoint::new(-90.0, 0.0),
        GeoPoint::new(-90.0, 180.0),
    ];
    display_node(&proj, &west, 0, eye, &mut ctx, out);
    display_node(&proj, &east, 0, eye, &mut ctx, out);
    ctx
}

/// One global root quad clamped to ±85° latitude.
pub fn run_mercator(camera: Camera, out: &mut dyn BoundaryRenderer) -> TraversalContext {
    let proj = Projection::Mercator;
    let mut ctx = TraversalContext::for_projection(&proj);
    let eye = camera.surface();

    draw_meridian_seam(out, -180.0);

    let root: Quad = [
        GeoPoint::new(MERCATOR_MAX_LAT, -180.0),
        GeoPoint::new(MERCATOR_MAX_LAT, 180.0),
        GeoPoint::new(-MERCATOR_MAX_LAT, -180.0),
        GeoPoint::new(-MERCATOR_MAX_LAT, 180.0),
    ];
    display_node(&proj, &root, 0, eye, &mut ctx, out);
    ctx
}

/// One global root quad reaching the poles; latitude splits happen in the
/// remapped Mercator domain.
pub fn run_bent_mercator(camera: Camera, out: &mut dyn BoundaryRenderer) -> TraversalContext {
    let proj = Projection::BentMercator {
        max_lat: BENT_MERCATOR_MAPPED_LAT,
    };
    let mut ctx = TraversalContext::for_projection(&proj);
    let eye = camera.surface();

    draw_meridian_seam(out, -180.0);

    let root: Quad = [
        GeoPoint::new(90.0, -180.0),
        GeoPoint::new(90.0, 180.0),
        GeoPoint::new(-90.0, -180.0),
        GeoPoint::new(-90.0, 180.0),
    ];
    display_node(&proj, &root, 0, eye, &mut ctx, out);
    ctx
}

/// Six root quads: the four side faces of the unit cube plus the north and
/// south caps, corners reprojected onto the sphere.
pub fn run_cube_cell(camera: Camera, out: &mut dyn BoundaryRenderer) -> TraversalContext {
    let proj = Projection::CubeCell;
    let mut ctx = TraversalContext::for_projection(&proj);
    let eye = camera.surface();

    let v = cube_corners();

    // Static cube wireframe.
    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 3),
        (3, 2),
        (2, 0),
        (4, 5),
        (5, 7),
        (7, 6),
        (6, 4),
        (0, 5),
        (1, 4),
        (2, 7),
        (3, 6),
    ];
    for (a, b) in EDGES {
        out.draw_boundary_segment(v[a], v[b], LineKind::Geodesic);
    }

    let faces: [Quad; 6] = [
        [v[0], v[1], v[2], v[3]],
        [v[1], v[3], v[4], v[6]],
        [v[4], v[5], v[6], v[7]],
        [v[5], v[7], v[0], v[2]],
        [v[5], v[4], v[0], v[1]], // north cap
        [v[2], v[3], v[7], v[6]], // south cap
    ];
    for face in &faces {
        display_node(&proj, face, 0, eye, &mut ctx, out);
    }
    ctx
}

/// The eight unit-cube corners as surface points.
fn cube_corners() -> [GeoPoint; 8] {
    [
        cartesian_to_geo(DVec3::new(1.0, -1.0, 1.0)),
        cartesian_to_geo(DVec3::new(1.0, 1.0, 1.0)),
        cartesian_to_geo(DVec3::new(1.0, -1.0, -1.0)),
        cartesian_to_geo(DVec3::new(1.0, 1.0, -1.0)),
        cartesian_to_geo(DVec3::new(-1.0, 1.0, 1.0)),
        cartesian_to_geo(DVec3::new(-1.0, -1.0, 1.0)),
        cartesian_to_geo(DVec3::new(-1.0, 1.0, -1.0)),
        cartesian_to_geo(DVec3::new(-1.0, -1.0, -1.0)),
    ]
}

/// Static reference lines drawn before tiling: a hemisphere-seam meridian
/// split at the equator.
fn draw_meridian_seam(out: &mut dyn BoundaryRenderer, lon: f64) {
    out.draw_boundary_segment(GeoPoint::new(90.0, lon), GeoPoint::new(0.0, lon), LineKind::Grid);
    out.draw_boundary_segment(GeoPoint::new(0.0, lon), GeoPoint::new(-90.0, lon), LineKind::Grid);
}
