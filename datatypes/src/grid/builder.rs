use serde::{Deserialize, Serialize};
use snafu::ensure;

use super::{EdgePolicy, Grid};
use crate::error;
use crate::primitives::{BoundingBox2D, Cell, CellSize, Coordinate2D};
use crate::util::Result;

/// The largest number of cells a default `GridBuilder` produces
pub const DEFAULT_MAX_CELLS: usize = 10_000_000;

/// Tiles a bounding box with square cells.
///
/// Cells are enumerated column by column in ascending x order and, within each column,
/// in ascending y order. The `n`-th origin of an axis is `min + n * cell_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBuilder {
    max_cells: usize,
    edge_policy: EdgePolicy,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self {
            max_cells: DEFAULT_MAX_CELLS,
            edge_policy: EdgePolicy::default(),
        }
    }
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    #[must_use]
    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    /// Computes the grid covering `bbox`. The `crs` is attached to the result as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use vectorgrid_datatypes::grid::GridBuilder;
    /// use vectorgrid_datatypes::primitives::{BoundingBox2D, CellSize};
    ///
    /// let bbox = BoundingBox2D::from_extrema(0.0, 0.0, 10.0, 10.0).unwrap();
    /// let grid = GridBuilder::new()
    ///     .build(bbox, CellSize::new(5.0).unwrap(), "EPSG:4326")
    ///     .unwrap();
    ///
    /// assert_eq!(grid.len(), 4);
    /// assert_eq!(grid.crs(), "EPSG:4326");
    /// ```
    ///
    /// # Errors
    ///
    /// Fails with `GridTooLarge` if the grid would consist of more than `max_cells` cells
    ///
    pub fn build(
        &self,
        bbox: BoundingBox2D,
        cell_size: CellSize,
        crs: impl Into<String>,
    ) -> Result<Grid> {
        let size = cell_size.inner();
        let lower_left = bbox.lower_left();
        let upper_right = bbox.upper_right();

        let columns = self
            .edge_policy
            .cells_along_axis(lower_left.x, upper_right.x, size);
        let rows = self
            .edge_policy
            .cells_along_axis(lower_left.y, upper_right.y, size);

        let cells = if columns == 0. || rows == 0. {
            0.
        } else {
            columns * rows
        };

        ensure!(
            cells <= self.max_cells as f64,
            error::GridTooLarge {
                cells,
                max_cells: self.max_cells
            }
        );

        let columns = columns as usize;
        let rows = rows as usize;

        if cells == 0. {
            return Ok(Grid::new_unchecked(Vec::new(), columns, rows, crs.into()));
        }

        let mut grid_cells = Vec::with_capacity(columns * rows);

        for column in 0..columns {
            let x = lower_left.x + column as f64 * size;

            for row in 0..rows {
                let y = lower_left.y + row as f64 * size;

                grid_cells.push(Cell::new(column, row, Coordinate2D::new(x, y), cell_size));
            }
        }

        Ok(Grid::new_unchecked(grid_cells, columns, rows, crs.into()))
    }

    /// Validates the raw inputs and computes the grid.
    ///
    /// Non-finite values are reported first, then an unordered bounding box, then a non-positive cell size.
    pub fn build_from_extrema(
        &self,
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
        cell_size: f64,
        crs: impl Into<String>,
    ) -> Result<Grid> {
        for (name, value) in [
            ("xmin", xmin),
            ("ymin", ymin),
            ("xmax", xmax),
            ("ymax", ymax),
            ("cell_size", cell_size),
        ] {
            ensure!(value.is_finite(), error::NonFiniteInput { name, value });
        }

        let bbox = BoundingBox2D::from_extrema(xmin, ymin, xmax, ymax)?;
        let cell_size = CellSize::new(cell_size)?;

        self.build(bbox, cell_size, crs)
    }
}

/// Computes the grid of square cells of edge length `cell_size` covering the given extrema
/// using the default `GridBuilder`.
///
/// # Examples
///
/// ```
/// use vectorgrid_datatypes::grid::build_grid;
///
/// let grid = build_grid(0.0, 0.0, 10.0, 10.0, 4.0, "ESRI:102001").unwrap();
///
/// assert_eq!(grid.columns(), 3);
/// assert_eq!(grid.rows(), 3);
/// ```
///
pub fn build_grid(
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    cell_size: f64,
    crs_code: &str,
) -> Result<Grid> {
    GridBuilder::default().build_from_extrema(xmin, ymin, xmax, ymax, cell_size, crs_code)
}
