//! Regular vector grids of square cells covering a bounding box

mod builder;
mod edge_policy;
mod vector_grid;

pub use builder::{DEFAULT_MAX_CELLS, GridBuilder, build_grid};
pub use edge_policy::EdgePolicy;
pub use vector_grid::Grid;
