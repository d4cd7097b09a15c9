use std::path::Path;

use crate::data;
use crate::geo::Camera;
use crate::lod::ProjectionKind;
use crate::map::{Basemap, GlobeView};

/// Application state: the globe view, the projection being displayed, and
/// the coastline underlay.
pub struct App {
    pub view: GlobeView,
    pub basemap: Basemap,
    pub mode: ProjectionKind,
    pub show_basemap: bool,
    pub should_quit: bool,
    /// Last mouse position for drag tracking.
    pub last_mouse: Option<(u16, u16)>,
}

impl App {
    pub fn new(width: usize, height: usize) -> Self {
        let (pixel_width, pixel_height) = canvas_pixels(width, height);
        Self {
            view: GlobeView::world(pixel_width, pixel_height),
            basemap: Basemap::new(Vec::new()),
            mode: ProjectionKind::PlateCarree,
            show_basemap: true,
            should_quit: false,
            last_mouse: None,
        }
    }

    /// Load the coastline underlay, falling back to the built-in outline.
    pub fn load_basemap(&mut self, data_dir: &Path) {
        let mut lines = Vec::new();
        if data_dir.exists() {
            match data::load_coastlines(data_dir) {
                Ok(loaded) => lines = loaded,
                Err(e) => eprintln!("Warning: Failed to load basemap: {}", e),
            }
        }
        if lines.is_empty() {
            lines = data::simple_world();
        }
        self.basemap = Basemap::new(lines);
    }

    /// Update the view when the terminal resizes.
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = canvas_pixels(width, height);
        self.view.set_size(pixel_width, pixel_height);
    }

    /// Rotate the globe by a braille-pixel delta.
    pub fn rotate(&mut self, dx: i32, dy: i32) {
        self.view.rotate_drag(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    /// The camera fix the LOD traversal runs against.
    pub fn camera(&self) -> Camera {
        self.view.camera()
    }

    pub fn set_mode(&mut self, mode: ProjectionKind) {
        self.mode = mode;
    }

    pub fn next_mode(&mut self) {
        self.mode = self.mode.next();
    }

    pub fn toggle_basemap(&mut self) {
        self.show_basemap = !self.show_basemap;
    }

    /// Re-center on the world view, keeping the canvas size.
    pub fn reset_view(&mut self) {
        self.view = GlobeView::world(self.view.width, self.view.height);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle mouse drag: rotate so the surface follows the cursor.
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            // Terminal cells are 2 braille pixels wide and 4 tall.
            let dx = (last_x as i32 - x as i32) * 2;
            let dy = (last_y as i32 - y as i32) * 4;
            self.rotate(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when the mouse button is released.
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Current view center as a display string.
    pub fn center_coords(&self) -> String {
        let center = self.view.center();
        format!(
            "{:.1}°{}, {:.1}°{}",
            center.lat.abs(),
            if center.lat >= 0.0 { "N" } else { "S" },
            center.lon.abs(),
            if center.lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Camera altitude as a display string.
    pub fn altitude_label(&self) -> String {
        format!("{:.0} km", self.camera().alt_m / 1000.0)
    }

    /// Current zoom level as a display string.
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.view.effective_zoom())
    }
}

/// Braille canvas pixel size for a terminal of `width x height` cells,
/// minus the border and status bar.
fn canvas_pixels(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3); // border + status bar
    (inner_width * 2, inner_height * 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_app_sizes_canvas_for_borders() {
        let app = App::new(82, 27);
        assert_eq!(app.view.width, 160);
        assert_eq!(app.view.height, 96);
    }

    #[test]
    fn test_mode_controls() {
        let mut app = App::new(80, 24);
        assert_eq!(app.mode, ProjectionKind::PlateCarree);
        app.next_mode();
        assert_eq!(app.mode, ProjectionKind::Mercator);
        app.set_mode(ProjectionKind::CubeCell);
        assert_eq!(app.mode, ProjectionKind::CubeCell);
    }

    #[test]
    fn test_drag_rotates_view() {
        let mut app = App::new(80, 24);
        let before = app.view.center();
        app.handle_drag(40, 12);
        app.handle_drag(30, 12); // cursor moved left: surface follows
        let after = app.view.center();
        assert!(after.lon > before.lon);
        app.end_drag();
        assert!(app.last_mouse.is_none());
    }

    #[test]
    fn test_fallback_basemap_loads() {
        let mut app = App::new(80, 24);
        app.load_basemap(Path::new("definitely/not/here"));
        assert!(!app.basemap.coastlines.is_empty());
    }
}
