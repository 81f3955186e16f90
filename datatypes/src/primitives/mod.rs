mod bounding_box;
mod cell;
mod cell_size;
mod coordinate;

pub use bounding_box::BoundingBox2D;
pub use cell::Cell;
pub use cell_size::CellSize;
pub use coordinate::Coordinate2D;
