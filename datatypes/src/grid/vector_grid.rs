use geojson::{Feature, FeatureCollection, JsonObject, feature::Id};
use serde::Serialize;

use crate::primitives::{BoundingBox2D, Cell};

/// An ordered collection of square cells together with the label of their coordinate reference system.
///
/// A `Grid` is only created by a `GridBuilder`, so it cannot be deserialized:
///
/// ```compile_fail
/// use vectorgrid_datatypes::grid::Grid;
///
/// let grid: Grid = serde_json::from_str(r#"{"cells": [], "columns": 2, "rows": 2, "crs": "X"}"#).unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    cells: Vec<Cell>,
    columns: usize,
    rows: usize,
    crs: String,
}

impl Grid {
    /// `cells` must contain `columns * rows` cells, column by column
    pub(crate) fn new_unchecked(cells: Vec<Cell>, columns: usize, rows: usize, crs: String) -> Self {
        debug_assert_eq!(cells.len(), columns * rows);

        Self {
            cells,
            columns,
            rows,
            crs,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells along the x-axis
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells along the y-axis
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The coordinate reference system label, exactly as it was given
    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&Cell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }

        self.cells.get(column * self.rows + row)
    }

    /// The area covered by all cells or `None` if the grid is empty
    pub fn spatial_bounds(&self) -> Option<BoundingBox2D> {
        let first = self.cells.first()?;
        let last = self.cells.last()?;

        Some(BoundingBox2D::new_unchecked(
            first.lower_left(),
            last.upper_right(),
        ))
    }

    /// Converts the grid into a GeoJSON feature collection.
    ///
    /// Each feature carries its position in the enumeration as `id` and the `column` and `row` as properties.
    /// The CRS label is stored in the non-standard but widely read `crs` member of the collection.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .cells
            .iter()
            .enumerate()
            .map(|(id, cell)| {
                let mut properties = JsonObject::new();
                properties.insert("column".to_string(), cell.column().into());
                properties.insert("row".to_string(), cell.row().into());

                Feature {
                    bbox: None,
                    geometry: Some(cell.into()),
                    id: Some(Id::Number(id.into())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        let mut foreign_members = JsonObject::new();
        foreign_members.insert(
            "crs".to_string(),
            serde_json::json!({
                "type": "name",
                "properties": {
                    "name": self.crs,
                },
            }),
        );

        FeatureCollection {
            bbox: self.spatial_bounds().map(|bounds| {
                let ll = bounds.lower_left();
                let ur = bounds.upper_right();
                vec![ll.x, ll.y, ur.x, ur.y]
            }),
            features,
            foreign_members: Some(foreign_members),
        }
    }
}

impl<'g> IntoIterator for &'g Grid {
    type Item = &'g Cell;
    type IntoIter = std::slice::Iter<'g, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl From<&Grid> for geo::MultiPolygon<f64> {
    fn from(grid: &Grid) -> geo::MultiPolygon<f64> {
        grid.iter().map(Cell::to_polygon).collect()
    }
}

impl From<&Grid> for FeatureCollection {
    fn from(grid: &Grid) -> FeatureCollection {
        grid.to_feature_collection()
    }
}
