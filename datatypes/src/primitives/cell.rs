use serde::Serialize;
use wkt::ToWkt;

use super::{BoundingBox2D, CellSize, Coordinate2D};

/// One square tile of a vector grid
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    column: usize,
    row: usize,
    bounds: BoundingBox2D,
}

impl Cell {
    /// Creates the cell with lower left corner `origin` and edge length `size`
    ///
    /// # Examples
    ///
    /// ```
    /// use vectorgrid_datatypes::primitives::{Cell, CellSize, Coordinate2D};
    ///
    /// let cell = Cell::new(0, 0, Coordinate2D::new(1.0, 2.0), CellSize::new(0.5).unwrap());
    ///
    /// assert_eq!(cell.upper_right(), Coordinate2D::new(1.5, 2.5));
    /// ```
    ///
    pub fn new(column: usize, row: usize, origin: Coordinate2D, size: CellSize) -> Self {
        Self {
            column,
            row,
            bounds: BoundingBox2D::new_unchecked(origin, origin + size.inner()),
        }
    }

    /// The index of the cell along the x-axis
    pub fn column(&self) -> usize {
        self.column
    }

    /// The index of the cell along the y-axis
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn lower_left(&self) -> Coordinate2D {
        self.bounds.lower_left()
    }

    pub fn upper_right(&self) -> Coordinate2D {
        self.bounds.upper_right()
    }

    pub fn width(&self) -> f64 {
        self.bounds.size_x()
    }

    pub fn height(&self) -> f64 {
        self.bounds.size_y()
    }

    /// The four corners in counter-clockwise order, starting at the lower left
    pub fn corners(&self) -> [Coordinate2D; 4] {
        [
            self.bounds.lower_left(),
            self.bounds.lower_right(),
            self.bounds.upper_right(),
            self.bounds.upper_left(),
        ]
    }

    /// The closed exterior ring, i.e., the corners with the first one repeated at the end
    pub fn exterior_ring(&self) -> Vec<Coordinate2D> {
        let corners = self.corners();
        let mut ring = Vec::with_capacity(corners.len() + 1);
        ring.extend_from_slice(&corners);
        ring.push(corners[0]);
        ring
    }

    /// Checks if a coordinate is located inside the cell.
    /// The lower and left edges belong to the cell, the upper and right edges do not.
    pub fn contains_coordinate(&self, coordinate: &Coordinate2D) -> bool {
        let ll = self.bounds.lower_left();
        let ur = self.bounds.upper_right();

        crate::util::ranges::value_in_range(coordinate.x, ll.x, ur.x)
            && crate::util::ranges::value_in_range(coordinate.y, ll.y, ur.y)
    }

    pub fn to_polygon(&self) -> geo::Polygon<f64> {
        self.into()
    }

    pub fn wkt_string(&self) -> String {
        self.to_polygon().wkt_string()
    }
}

impl From<&Cell> for geo::Polygon<f64> {
    fn from(cell: &Cell) -> geo::Polygon<f64> {
        let exterior: Vec<geo::Coord<f64>> =
            cell.exterior_ring().into_iter().map(Into::into).collect();
        geo::Polygon::new(geo::LineString::from(exterior), vec![])
    }
}

impl From<&Cell> for geojson::Geometry {
    fn from(cell: &Cell) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&cell.to_polygon()))
    }
}
