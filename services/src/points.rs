use crate::config::{self, get_config_element};
use crate::error::{self, Result};
use crate::geoparquet;
use clap::ValueEnum;
use geojson::GeoJson;
use snafu::{OptionExt, ResultExt};
use std::path::Path;
use vectorgrid_datatypes::primitives::{BoundingBox2D, Coordinate2D};

/// File formats points can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PointFormat {
    /// Delimited text with a header line
    Csv,
    /// A `FeatureCollection`, `Feature` or bare geometry
    #[value(name = "geojson")]
    GeoJson,
    /// WKB points or numeric x and y columns
    #[value(name = "geoparquet")]
    GeoParquet,
}

impl PointFormat {
    /// Infers the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv" | "txt") => Ok(PointFormat::Csv),
            Some("geojson" | "json") => Ok(PointFormat::GeoJson),
            Some("parquet" | "geoparquet") => Ok(PointFormat::GeoParquet),
            _ => error::UnknownFileFormat { path }.fail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOptions {
    /// `None` infers the format from the file extension
    pub format: Option<PointFormat>,
    pub x_column: String,
    pub y_column: String,
    /// Exchanges x and y of every point, e.g. for `lat,lon` ordered sources
    pub swap_xy: bool,
}

impl PointOptions {
    /// Options with the column names of the `points` config section
    pub fn from_config() -> Result<Self> {
        let points: config::Points = get_config_element()?;

        Ok(Self {
            format: None,
            x_column: points.x_column,
            y_column: points.y_column,
            swap_xy: false,
        })
    }
}

impl Default for PointOptions {
    fn default() -> Self {
        Self {
            format: None,
            x_column: "x".to_owned(),
            y_column: "y".to_owned(),
            swap_xy: false,
        }
    }
}

/// Reads all points of a file.
///
/// Non-point geometries of GeoJSON and GeoParquet input are skipped.
pub fn read_points(path: &Path, options: &PointOptions) -> Result<Vec<Coordinate2D>> {
    let format = match options.format {
        Some(format) => format,
        None => PointFormat::from_path(path)?,
    };

    let mut points = match format {
        PointFormat::Csv => read_csv_points(path, &options.x_column, &options.y_column)?,
        PointFormat::GeoJson => read_geojson_points(path)?,
        PointFormat::GeoParquet => {
            geoparquet::read_points(path, &options.x_column, &options.y_column)?
        }
    };

    if options.swap_xy {
        points.iter_mut().for_each(|point| *point = point.swapped());
    }

    tracing::debug!(
        path = %path.display(),
        ?format,
        points = points.len(),
        "read points"
    );

    Ok(points)
}

/// The smallest bounding box containing all points of a file
pub fn point_extent(path: &Path, options: &PointOptions) -> Result<BoundingBox2D> {
    let points = read_points(path, options)?;

    let extent = BoundingBox2D::from_coord_iter(points).context(error::EmptyPointSet { path })?;

    tracing::debug!(path = %path.display(), ?extent, "computed point extent");

    Ok(extent)
}

fn read_csv_points(path: &Path, x_column: &str, y_column: &str) -> Result<Vec<Coordinate2D>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context(error::Csv { path })?;

    let headers = reader.headers().context(error::Csv { path })?;
    let x_index = column_index(headers, x_column, path)?;
    let y_index = column_index(headers, y_column, path)?;

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record.context(error::Csv { path })?;
        let line = record.position().map_or(0, csv::Position::line);

        let x = parse_number(record.get(x_index), line, x_column)?;
        let y = parse_number(record.get(y_index), line, y_column)?;

        points.push(Coordinate2D::new(x, y));
    }

    Ok(points)
}

fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == column)
        .context(error::MissingColumn { path, column })
}

/// Parses a coordinate value, rejecting missing, unparsable and non-finite values
fn parse_number(value: Option<&str>, line: u64, column: &str) -> Result<f64> {
    let value = value.unwrap_or_default();

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => error::InvalidNumber {
            value,
            line,
            column,
        }
        .fail(),
    }
}

fn read_geojson_points(path: &Path) -> Result<Vec<Coordinate2D>> {
    let content = std::fs::read_to_string(path).context(error::Io { path })?;
    let geojson = content
        .parse::<GeoJson>()
        .context(error::GeoJson { path })?;

    let mut points = Vec::new();

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            for geometry in collection.features.into_iter().filter_map(|f| f.geometry) {
                collect_points(&geometry.value, &mut points);
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = feature.geometry {
                collect_points(&geometry.value, &mut points);
            }
        }
        GeoJson::Geometry(geometry) => collect_points(&geometry.value, &mut points),
    }

    Ok(points)
}

fn collect_points(value: &geojson::Value, points: &mut Vec<Coordinate2D>) {
    match value {
        geojson::Value::Point(position) => push_position(position, points),
        geojson::Value::MultiPoint(positions) => {
            for position in positions {
                push_position(position, points);
            }
        }
        geojson::Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_points(&geometry.value, points);
            }
        }
        _ => tracing::debug!("skipping non-point geometry"),
    }
}

fn push_position(position: &[f64], points: &mut Vec<Coordinate2D>) {
    if let [x, y, ..] = *position {
        points.push(Coordinate2D::new(x, y));
    } else {
        tracing::debug!(?position, "skipping position with less than two ordinates");
    }
}
