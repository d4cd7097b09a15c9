use crate::braille::BrailleCanvas;
use crate::geo::GeoPoint;
use crate::lod::{BoundaryRenderer, LineKind};
use crate::map::geometry::draw_line;
use crate::map::globe::{walk_great_circle, GlobeView};

/// A geographic line (sequence of surface points).
pub type LineString = Vec<GeoPoint>;

/// Rasterizes tile boundary segments onto a braille canvas through the
/// globe view. This is the host side of the traversal's line-drawing
/// collaborator.
pub struct GridRenderer<'a> {
    canvas: &'a mut BrailleCanvas,
    view: &'a GlobeView,
}

impl<'a> GridRenderer<'a> {
    pub fn new(canvas: &'a mut BrailleCanvas, view: &'a GlobeView) -> Self {
        Self { canvas, view }
    }

    /// Draw the arc from `a` to `b`, tessellated along the great circle so
    /// it curves correctly on the orthographic globe.
    fn draw_arc(&mut self, a: GeoPoint, b: GeoPoint) {
        let mut prev = self.view.project(a);
        walk_great_circle(a, b, |p| {
            let next = self.view.project(p);
            if let (Some(p1), Some(p2)) = (prev, next) {
                if self.view.line_might_be_visible(p1, p2) {
                    draw_line(self.canvas, p1.0, p1.1, p2.0, p2.1);
                }
            }
            prev = next;
        });
    }
}

impl BoundaryRenderer for GridRenderer<'_> {
    fn draw_boundary_segment(&mut self, a: GeoPoint, b: GeoPoint, kind: LineKind) {
        match kind {
            LineKind::Grid => {
                // Follow the lat/lon grid, then tessellate each short piece.
                let mut prev = a;
                for p in grid_line_points(a, b) {
                    self.draw_arc(prev, p);
                    prev = p;
                }
            }
            LineKind::Geodesic => self.draw_arc(a, b),
        }
    }
}

/// Interior points of a line that is straight in a lat/lon projection,
/// stepped so each piece spans at most `10·cos(worst latitude) + 0.01`
/// degrees of longitude; latitude is interpolated linearly across the
/// steps. Includes the endpoint, not the start.
pub fn grid_line_points(a: GeoPoint, b: GeoPoint) -> Vec<GeoPoint> {
    let delta_lon = b.lon - a.lon;
    let worst_lat = a.lat.abs().max(b.lat.abs());
    let step_size = 10.0 * worst_lat.to_radians().cos() + 0.01;
    let steps = (delta_lon.abs() / step_size).floor() as usize;

    let step_lat = (b.lat - a.lat) / (steps + 1) as f64;
    let step_lon = delta_lon / (steps + 1) as f64;

    let mut points = Vec::with_capacity(steps + 1);
    let mut lat = a.lat;
    let mut lon = a.lon;
    for _ in 0..steps {
        lat += step_lat;
        lon += step_lon;
        points.push(GeoPoint::new(lat, lon));
    }
    points.push(b);
    points
}

/// Coastline underlay drawn beneath the tiling grid for geographic context.
pub struct Basemap {
    pub coastlines: Vec<LineString>,
}

impl Basemap {
    pub fn new(coastlines: Vec<LineString>) -> Self {
        Self { coastlines }
    }

    /// Render every coastline with viewport culling. Consecutive points
    /// are close enough in the source data to draw as straight segments.
    pub fn render(&self, canvas: &mut BrailleCanvas, view: &GlobeView) {
        for line in &self.coastlines {
            if line.len() < 2 {
                continue;
            }

            let mut prev: Option<(i32, i32)> = None;
            for &point in line {
                let projected = view.project(point);
                if let (Some(p1), Some(p2)) = (prev, projected) {
                    let dist = ((p2.0 - p1.0).abs() + (p2.1 - p1.1).abs()) as usize;
                    if dist < view.width && view.line_might_be_visible(p1, p2) {
                        draw_line(canvas, p1.0, p1.1, p2.0, p2.1);
                    }
                }
                prev = projected;
            }
        }
    }
}
