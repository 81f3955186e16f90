mod extent;
mod grid;
mod validate;

pub use extent::{Extent, PointArgs, print_extent};
pub use grid::{CreateGrid, create_grid, parse_bounds};
pub use validate::{Validate, validate};
