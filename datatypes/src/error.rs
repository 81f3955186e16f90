use snafu::Snafu;

use crate::primitives::Coordinate2D;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))] // disables default `Snafu` suffix
pub enum Error {
    #[snafu(display("Input `{}` must be finite, but is {}", name, value))]
    NonFiniteInput { name: &'static str, value: f64 },

    #[snafu(display(
        "The conditions ll.x <= ur.x && ll.y <= ur.y are not met by ll:{} ur:{}",
        lower_left_coordinate,
        upper_right_coordinate
    ))]
    InvalidBoundingBox {
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    },

    #[snafu(display("Cell size must be greater than zero, but is {}", value))]
    InvalidCellSize { value: f64 },

    #[snafu(display(
        "The grid would consist of {} cells, but at most {} are allowed",
        cells,
        max_cells
    ))]
    GridTooLarge { cells: f64, max_cells: usize },
}
