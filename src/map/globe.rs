use glam::DVec3;

use crate::geo::{Camera, GeoPoint, EARTH_RADIUS_M};

/// Reported camera altitude at the base (world-view) zoom; zooming in
/// scales it down proportionally.
const WORLD_VIEW_ALT_M: f64 = 2.0 * EARTH_RADIUS_M;

/// Orthographic view of the rotating sphere. Orientation is an orthonormal
/// frame (3 column vectors) so point transformation is three dot products.
#[derive(Clone)]
pub struct GlobeView {
    /// Direction from the sphere center toward the camera.
    forward: DVec3,
    /// Points east on screen.
    right: DVec3,
    /// Points north on screen.
    up: DVec3,
    /// Sphere radius in braille pixels (controls zoom).
    radius: f64,
    /// Canvas pixel width.
    pub width: usize,
    /// Canvas pixel height.
    pub height: usize,
}

impl GlobeView {
    /// Build a view centered on `center` with given pixel radius.
    pub fn new(center: GeoPoint, radius: f64, width: usize, height: usize) -> Self {
        let lat_rad = center.lat.to_radians();
        let lon_rad = center.lon.to_radians();

        // Forward = direction from origin to the center point.
        let forward = DVec3::new(
            lat_rad.cos() * lon_rad.cos(),
            lat_rad.cos() * lon_rad.sin(),
            lat_rad.sin(),
        );

        // Up = derivative of forward w.r.t. latitude (points north).
        let raw_up = DVec3::new(
            -lat_rad.sin() * lon_rad.cos(),
            -lat_rad.sin() * lon_rad.sin(),
            lat_rad.cos(),
        );

        let right = forward.cross(raw_up).normalize();
        let up = right.cross(forward).normalize();

        Self {
            forward,
            right,
            up,
            radius,
            width,
            height,
        }
    }

    /// A whole-globe view for the given canvas size.
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(GeoPoint::new(20.0, 0.0), width as f64 * 0.35, width, height)
    }

    /// The surface point the view is centered on.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            self.forward.z.clamp(-1.0, 1.0).asin().to_degrees(),
            self.forward.y.atan2(self.forward.x).to_degrees(),
        )
    }

    /// The camera fix this view represents: its center point, at an
    /// altitude shrinking with zoom.
    pub fn camera(&self) -> Camera {
        let center = self.center();
        Camera::new(center.lat, center.lon, WORLD_VIEW_ALT_M / self.effective_zoom())
    }

    /// Zoom factor normalized so the world view is 1.
    pub fn effective_zoom(&self) -> f64 {
        self.radius / (self.width as f64 * 0.35)
    }

    /// Project a surface point to screen pixels.
    /// Returns `None` for back-face points (behind the visible hemisphere).
    pub fn project(&self, p: GeoPoint) -> Option<(i32, i32)> {
        let v = unit_vector(p);

        // Dot with forward: positive = front-facing.
        if v.dot(self.forward) < 0.0 {
            return None;
        }

        let sx = v.dot(self.right);
        let sy = v.dot(self.up);

        let px = (self.width as f64 / 2.0 + sx * self.radius) as i32;
        let py = (self.height as f64 / 2.0 - sy * self.radius) as i32;
        Some((px, py))
    }

    /// Rotate the globe by a pixel drag delta.
    /// Positive dx = dragged left, so the view center shifts east and the
    /// surface follows the cursor.
    pub fn rotate_drag(&mut self, dx: i32, dy: i32) {
        let angle_x = (dx as f64) / self.radius;
        let angle_y = -(dy as f64) / self.radius;

        // Around up: horizontal drag changes longitude.
        if angle_x.abs() > 1e-10 {
            let (sin_a, cos_a) = angle_x.sin_cos();
            let new_forward = self.forward * cos_a + self.right * sin_a;
            let new_right = self.right * cos_a - self.forward * sin_a;
            self.forward = new_forward.normalize();
            self.right = new_right.normalize();
        }

        // Around right: vertical drag changes latitude.
        if angle_y.abs() > 1e-10 {
            let (sin_a, cos_a) = angle_y.sin_cos();
            let new_forward = self.forward * cos_a + self.up * sin_a;
            let new_up = self.up * cos_a - self.forward * sin_a;
            self.forward = new_forward.normalize();
            self.up = new_up.normalize();
        }
    }

    /// Zoom in by scaling the sphere radius.
    pub fn zoom_in(&mut self) {
        self.radius = (self.radius * 1.5).min(self.width as f64 * 35.0);
    }

    /// Zoom out by scaling the sphere radius.
    pub fn zoom_out(&mut self) {
        self.radius = (self.radius / 1.5).max(self.width as f64 * 0.35);
    }

    /// Set viewport dimensions, keeping the zoom factor.
    pub fn set_size(&mut self, width: usize, height: usize) {
        let zoom = self.effective_zoom();
        self.width = width;
        self.height = height;
        self.radius = zoom * width as f64 * 0.35;
    }

    /// Check if a line segment might be visible (rough bounding box check).
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

/// Convert a surface point to a unit-sphere vector.
#[inline(always)]
fn unit_vector(p: GeoPoint) -> DVec3 {
    let lat_rad = p.lat.to_radians();
    let lon_rad = p.lon.to_radians();
    DVec3::new(
        lat_rad.cos() * lon_rad.cos(),
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
    )
}

/// Interpolate along the great circle arc from `a` to `b`, calling the
/// visitor for each subdivision point after `a` (endpoint included).
/// Roughly 2° segments, enough for smooth curves at braille resolution.
#[inline]
pub fn walk_great_circle(a: GeoPoint, b: GeoPoint, mut visitor: impl FnMut(GeoPoint)) {
    let va = unit_vector(a);
    let vb = unit_vector(b);

    let dot = va.dot(vb).clamp(-1.0, 1.0);
    let angle = dot.acos();

    let steps = ((angle.to_degrees() / 2.0).ceil() as usize).max(1);

    let sin_angle = angle.sin();
    if steps == 1 || sin_angle.abs() < 1e-10 {
        // Short, coincident, or antipodal: just emit the endpoint.
        visitor(b);
        return;
    }

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let sa = ((1.0 - t) * angle).sin() / sin_angle;
        let sb = (t * angle).sin() / sin_angle;
        let p = va * sa + vb * sb;

        visitor(GeoPoint::new(
            p.z.clamp(-1.0, 1.0).asin().to_degrees(),
            p.y.atan2(p.x).to_degrees(),
        ));
    }
}
