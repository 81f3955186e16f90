use std::fmt;

use crate::error;
use crate::util::Result;
use serde::{Deserialize, Serialize};
use snafu::ensure;

/// The edge length of a square grid cell in units of the grid's coordinate reference system
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CellSize(f64);

impl CellSize {
    /// Creates a new cell size
    ///
    /// # Examples
    ///
    /// ```
    /// use vectorgrid_datatypes::primitives::CellSize;
    ///
    /// assert!(CellSize::new(0.5).is_ok());
    /// assert!(CellSize::new(0.0).is_err());
    /// assert!(CellSize::new(f64::NAN).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// This constructor fails if the value is not finite or not greater than zero
    ///
    pub fn new(value: f64) -> Result<Self> {
        ensure!(
            value.is_finite(),
            error::NonFiniteInput {
                name: "cell_size",
                value
            }
        );
        ensure!(value > 0.0, error::InvalidCellSize { value });
        Ok(Self(value))
    }

    pub fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    pub fn inner(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for CellSize {
    type Error = crate::error::Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CellSize> for f64 {
    fn from(cell_size: CellSize) -> f64 {
        cell_size.0
    }
}

impl fmt::Display for CellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
