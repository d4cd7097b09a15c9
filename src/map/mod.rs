mod geometry;
mod globe;
mod renderer;

pub use geometry::{draw_line, draw_marker};
pub use globe::{walk_great_circle, GlobeView};
pub use renderer::{grid_line_points, Basemap, GridRenderer, LineString};
