use super::Coordinate2D;
use crate::error;
use crate::util::Result;
use serde::{Deserialize, Serialize};
use snafu::ensure;

#[derive(Copy, Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
#[repr(C)]
/// The bounding box of a set of points.
/// Note: may degenerate to a line or a point!
pub struct BoundingBox2D {
    lower_left_coordinate: Coordinate2D,
    upper_right_coordinate: Coordinate2D,
}

impl BoundingBox2D {
    /// Creates a new bounding box
    ///
    /// # Examples
    ///
    /// ```
    /// use vectorgrid_datatypes::primitives::{Coordinate2D, BoundingBox2D};
    ///
    /// let ll = Coordinate2D::new(1.0, 1.0);
    /// let ur = Coordinate2D::new(2.0, 2.0);
    /// let bbox = BoundingBox2D::new(ll, ur).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// This constructor fails if a value is not finite or if the coordinate's values are not in order
    ///
    pub fn new(
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    ) -> Result<Self> {
        for (name, value) in [
            ("xmin", lower_left_coordinate.x),
            ("ymin", lower_left_coordinate.y),
            ("xmax", upper_right_coordinate.x),
            ("ymax", upper_right_coordinate.y),
        ] {
            ensure!(value.is_finite(), error::NonFiniteInput { name, value });
        }

        ensure!(
            lower_left_coordinate.x <= upper_right_coordinate.x
                && lower_left_coordinate.y <= upper_right_coordinate.y,
            error::InvalidBoundingBox {
                lower_left_coordinate,
                upper_right_coordinate
            }
        );
        Ok(Self {
            lower_left_coordinate,
            upper_right_coordinate,
        })
    }

    /// Creates a new bounding box from its four extrema
    ///
    /// # Examples
    ///
    /// ```
    /// use vectorgrid_datatypes::primitives::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::from_extrema(0.0, 0.0, 10.0, 5.0).unwrap();
    ///
    /// assert_eq!(bbox.size_x(), 10.0);
    /// assert_eq!(bbox.size_y(), 5.0);
    /// ```
    ///
    pub fn from_extrema(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self> {
        Self::new((xmin, ymin).into(), (xmax, ymax).into())
    }

    /// Creates a new bounding box unchecked
    pub fn new_unchecked(
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    ) -> Self {
        Self {
            lower_left_coordinate,
            upper_right_coordinate,
        }
    }

    /// Returns the `Coordnate2D` representing the lower left edge of the bounding box
    ///
    /// # Examples
    ///
    /// ```
    /// use vectorgrid_datatypes::primitives::{Coordinate2D, BoundingBox2D};
    ///
    /// let ll = Coordinate2D::new(1.0, 1.0);
    /// let ur = Coordinate2D::new(2.0, 2.0);
    /// let bbox = BoundingBox2D::new(ll, ur).unwrap();
    ///
    /// assert_eq!(bbox.lower_left(), (1.0, 1.0).into());
    /// ```
    ///
    pub fn lower_left(&self) -> Coordinate2D {
        self.lower_left_coordinate
    }

    /// Returns the `Coordnate2D` representing the upper right edge of the bounding box
    pub fn upper_right(&self) -> Coordinate2D {
        self.upper_right_coordinate
    }

    pub fn upper_left(&self) -> Coordinate2D {
        (self.lower_left_coordinate.x, self.upper_right_coordinate.y).into()
    }

    pub fn lower_right(&self) -> Coordinate2D {
        (self.upper_right_coordinate.x, self.lower_left_coordinate.y).into()
    }

    /// Returns the width of the bounding box
    pub fn size_x(&self) -> f64 {
        self.upper_right_coordinate.x - self.lower_left_coordinate.x
    }

    /// Returns the height of the bounding box
    pub fn size_y(&self) -> f64 {
        self.upper_right_coordinate.y - self.lower_left_coordinate.y
    }

    /// Checks if a coordinate is located inside the bounding box
    ///
    /// # Examples
    ///
    /// ```
    /// use vectorgrid_datatypes::primitives::{Coordinate2D, BoundingBox2D};
    ///
    /// let ll = Coordinate2D::new(1.0, 1.0);
    /// let ur = Coordinate2D::new(2.0, 2.0);
    /// let bbox = BoundingBox2D::new(ll, ur).unwrap();
    ///
    /// assert!(bbox.contains_coordinate(&(1.5, 1.5).into()));
    /// ```
    ///
    pub fn contains_coordinate(&self, coordinate: &Coordinate2D) -> bool {
        crate::util::ranges::value_in_range_inclusive(
            coordinate.x,
            self.lower_left_coordinate.x,
            self.upper_right_coordinate.x,
        ) && crate::util::ranges::value_in_range_inclusive(
            coordinate.y,
            self.lower_left_coordinate.y,
            self.upper_right_coordinate.y,
        )
    }

    /// Checks if the interiors of both bounding boxes have area in common.
    /// Boxes that only share an edge or a corner do not overlap.
    pub fn overlaps_bbox(&self, other_bbox: &Self) -> bool {
        self.lower_left_coordinate.x < other_bbox.upper_right_coordinate.x
            && other_bbox.lower_left_coordinate.x < self.upper_right_coordinate.x
            && self.lower_left_coordinate.y < other_bbox.upper_right_coordinate.y
            && other_bbox.lower_left_coordinate.y < self.upper_right_coordinate.y
    }

    pub fn extend_with_coord(&mut self, coord: Coordinate2D) {
        self.lower_left_coordinate = self.lower_left_coordinate.min_elements(coord);
        self.upper_right_coordinate = self.upper_right_coordinate.max_elements(coord);
    }

    /// Returns the smallest bounding box that contains all coordinates or `None` if there are none
    pub fn from_coord_iter<I: IntoIterator<Item = Coordinate2D>>(iter: I) -> Option<Self> {
        let mut iterator = iter.into_iter();

        let first = iterator.next().map(|c| BoundingBox2D::new_unchecked(c, c));

        first.map(|mut f| {
            for c in iterator {
                f.extend_with_coord(c);
            }
            f
        })
    }
}
