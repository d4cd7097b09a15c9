use crate::geo::GeoPoint;
use crate::lod::projection::{projection_constant, Projection, Quad, ERROR_THRESHOLD_PIXELS};

/// How a boundary segment between two surface points should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Straight in a lat/lon projection. The renderer subdivides the span
    /// into short longitude steps so the drawn line follows the grid
    /// rather than the great circle.
    Grid,
    /// Shortest arc between the endpoints.
    Geodesic,
}

/// The line-drawing collaborator the traversal reports boundaries to.
/// Implemented by the terminal grid renderer; `NullRenderer` discards
/// everything when only tile statistics are wanted.
pub trait BoundaryRenderer {
    fn draw_boundary_segment(&mut self, a: GeoPoint, b: GeoPoint, kind: LineKind);
}

/// Discards all segments.
pub struct NullRenderer;

impl BoundaryRenderer for NullRenderer {
    fn draw_boundary_segment(&mut self, _a: GeoPoint, _b: GeoPoint, _kind: LineKind) {}
}

/// Accumulator threaded through one traversal run and returned by value.
/// A fresh context per run replaces any process-wide counter: statistics
/// never leak between draws.
#[derive(Clone, Copy, Debug)]
pub struct TraversalContext {
    /// Levels below this always subdivide.
    pub min_level: u32,
    /// Levels at or beyond this never subdivide.
    pub max_level: u32,
    /// Terminal (non-subdivided) nodes seen so far.
    pub leaf_count: u64,
    /// Deepest level at which a leaf was produced.
    pub deepest_level: u32,
}

impl TraversalContext {
    pub fn new(min_level: u32, max_level: u32) -> Self {
        Self {
            min_level,
            max_level,
            leaf_count: 0,
            deepest_level: 0,
        }
    }

    /// A context with the projection's own level bounds.
    pub fn for_projection(proj: &Projection) -> Self {
        Self::new(proj.min_level(), proj.max_level())
    }
}

/// Estimated on-screen error when the camera sits inside the quad and no
/// positive distance exists; large enough to always force subdivision.
const CAMERA_INSIDE_ERROR_PX: f64 = 1e6;

/// Recursively tile a quad to the detail the current viewpoint warrants.
///
/// Levels below `ctx.min_level` subdivide unconditionally, levels at or
/// beyond `ctx.max_level` terminate unconditionally; in between, the quad
/// splits while its estimated screen-space error exceeds
/// `ERROR_THRESHOLD_PIXELS`. Every split reports its four interior edges
/// to `out` before recursing; every terminal node bumps the leaf counter.
pub fn display_node(
    proj: &Projection,
    quad: &Quad,
    level: u32,
    eye: GeoPoint,
    ctx: &mut TraversalContext,
    out: &mut dyn BoundaryRenderer,
) {
    let subdivide = if level < ctx.min_level {
        true
    } else if level >= ctx.max_level {
        false
    } else {
        let feature_size = proj.feature_size(quad);
        let distance = proj.view_distance(quad, eye);
        let estimated_error = if distance > 0.0 {
            projection_constant() * feature_size / distance
        } else {
            CAMERA_INSIDE_ERROR_PX
        };
        estimated_error > ERROR_THRESHOLD_PIXELS
    };

    if subdivide {
        let subdivision = proj.subdivide(quad);
        proj.draw_divisions(&subdivision, out);
        for child in subdivision.children(quad) {
            display_node(proj, &child, level + 1, eye, ctx, out);
        }
    } else {
        ctx.leaf_count += 1;
        ctx.deepest_level = ctx.deepest_level.max(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts segments per kind.
    struct CountingRenderer {
        grid: usize,
        geodesic: usize,
    }

    impl CountingRenderer {
        fn new() -> Self {
            Self { grid: 0, geodesic: 0 }
        }
    }

    impl BoundaryRenderer for CountingRenderer {
        fn draw_boundary_segment(&mut self, _a: GeoPoint, _b: GeoPoint, kind: LineKind) {
            match kind {
                LineKind::Grid => self.grid += 1,
                LineKind::Geodesic => self.geodesic += 1,
            }
        }
    }

    fn unit_quad() -> Quad {
        [
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 20.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(0.0, 20.0),
        ]
    }

    // Far enough that a 10° quad's error estimate is under a pixel.
    fn antipodal_eye() -> GeoPoint {
        GeoPoint::new(-5.0, -165.0)
    }

    #[test]
    fn test_min_level_forces_subdivision() {
        let projections = [
            Projection::PlateCarree,
            Projection::Mercator,
            Projection::BentMercator { max_lat: 85.0 },
            Projection::CubeCell,
        ];
        for proj in projections {
            let mut ctx = TraversalContext::new(2, 2);
            display_node(
                &proj,
                &unit_quad(),
                0,
                antipodal_eye(),
                &mut ctx,
                &mut NullRenderer,
            );
            // Two forced levels: exactly 4^2 leaves, however far the camera.
            assert_eq!(ctx.leaf_count, 16, "{proj:?}");
            assert_eq!(ctx.deepest_level, 2);
        }
    }

    #[test]
    fn test_max_level_terminates() {
        let mut ctx = TraversalContext::new(0, 0);
        display_node(
            &Projection::PlateCarree,
            &unit_quad(),
            0,
            GeoPoint::new(5.0, 15.0), // camera inside: would otherwise split
            &mut ctx,
            &mut NullRenderer,
        );
        assert_eq!(ctx.leaf_count, 1);
        assert_eq!(ctx.deepest_level, 0);
    }

    #[test]
    fn test_camera_inside_recurses_to_max_level() {
        // Nodes touching the camera point have view distance 0 and split
        // all the way down; their distant cousins stop early.
        let mut ctx = TraversalContext::new(0, 4);
        display_node(
            &Projection::PlateCarree,
            &unit_quad(),
            0,
            GeoPoint::new(5.0, 15.0),
            &mut ctx,
            &mut NullRenderer,
        );
        assert_eq!(ctx.deepest_level, 4);
        assert!(ctx.leaf_count > 4, "only {} leaves", ctx.leaf_count);
    }

    #[test]
    fn test_distant_camera_stops_immediately() {
        let mut ctx = TraversalContext::new(0, 14);
        display_node(
            &Projection::PlateCarree,
            &unit_quad(),
            0,
            antipodal_eye(),
            &mut ctx,
            &mut NullRenderer,
        );
        assert_eq!(ctx.leaf_count, 1);
    }

    #[test]
    fn test_leaf_count_monotonic_in_max_level() {
        let eye = GeoPoint::new(5.0, 14.0);
        let mut previous = 0;
        for max_level in 3..=8 {
            let mut ctx = TraversalContext::new(3, max_level);
            display_node(
                &Projection::PlateCarree,
                &unit_quad(),
                0,
                eye,
                &mut ctx,
                &mut NullRenderer,
            );
            assert!(
                ctx.leaf_count >= previous,
                "leaves dropped from {previous} to {} at max_level {max_level}",
                ctx.leaf_count
            );
            previous = ctx.leaf_count;
        }
    }

    #[test]
    fn test_divisions_drawn_per_split() {
        let mut ctx = TraversalContext::new(1, 1);
        let mut out = CountingRenderer::new();
        display_node(
            &Projection::PlateCarree,
            &unit_quad(),
            0,
            antipodal_eye(),
            &mut ctx,
            &mut out,
        );
        // One split, four interior edges, grid-aligned projection.
        assert_eq!(out.grid, 4);
        assert_eq!(out.geodesic, 0);

        let mut ctx = TraversalContext::new(1, 1);
        let mut out = CountingRenderer::new();
        display_node(
            &Projection::CubeCell,
            &unit_quad(),
            0,
            antipodal_eye(),
            &mut ctx,
            &mut out,
        );
        assert_eq!(out.geodesic, 4);
        assert_eq!(out.grid, 0);
    }
}
