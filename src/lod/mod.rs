mod projection;
mod scene;
mod traversal;

pub use projection::{Projection, Quad, Subdivision, ERROR_THRESHOLD_PIXELS, TILE_RESOLUTION};
pub use scene::{
    run_bent_mercator, run_cube_cell, run_mercator, run_plate_carree, ProjectionKind,
};
pub use traversal::{display_node, BoundaryRenderer, LineKind, NullRenderer, TraversalContext};
