//! Points from and grids to GeoParquet files with WKB encoded geometries

use crate::error::{self, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BinaryArray, Float64Array, GenericBinaryArray, OffsetSizeTrait,
    UInt64Array,
};
use arrow::datatypes::{DataType, Field, Float64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use geo_traits::{
    CoordTrait, GeometryCollectionTrait, GeometryTrait, GeometryType, MultiPointTrait, PointTrait,
};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, ensure};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use vectorgrid_datatypes::grid::Grid;
use vectorgrid_datatypes::primitives::Coordinate2D;
use wkb::reader::Wkb;

const GEO_METADATA_KEY: &str = "geo";
const GEOPARQUET_VERSION: &str = "1.1.0";
const GEOMETRY_COLUMN: &str = "geometry";
const WKB_ENCODING: &str = "WKB";

/// File metadata entry holding the CRS label exactly as it was given
pub const CRS_METADATA_KEY: &str = "crs";

/// The `geo` file metadata
#[derive(Debug, Serialize, Deserialize)]
struct GeoMetadata {
    version: String,
    primary_column: String,
    columns: HashMap<String, GeometryColumn>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeometryColumn {
    encoding: String,
    #[serde(default)]
    geometry_types: Vec<String>,
    /// Written as `null`, i.e., unknown, since the label is not PROJJSON
    #[serde(default)]
    crs: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bbox: Option<Vec<f64>>,
}

/// Where the points of a file are stored
#[derive(Debug, PartialEq, Eq)]
enum PointColumns {
    Wkb(String),
    Xy { x: String, y: String },
}

/// Writes `grid` as a single row group with the columns `id`, `column`, `row` and `geometry`.
///
/// `path` only names the destination in errors.
pub fn write_grid<W: Write + Send>(grid: &Grid, writer: W, path: &Path) -> Result<()> {
    let schema: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("id", DataType::UInt64, false),
        Field::new("column", DataType::UInt64, false),
        Field::new("row", DataType::UInt64, false),
        Field::new(GEOMETRY_COLUMN, DataType::Binary, false),
    ]));

    let mut geometries = Vec::with_capacity(grid.len());
    for cell in grid {
        let mut buffer = Vec::new();
        wkb::writer::write_geometry(&mut buffer, &cell.to_polygon(), &Default::default())
            .context(error::Wkb { path })?;
        geometries.push(buffer);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(0..grid.len() as u64)),
        Arc::new(UInt64Array::from_iter_values(
            grid.iter().map(|cell| cell.column() as u64),
        )),
        Arc::new(UInt64Array::from_iter_values(
            grid.iter().map(|cell| cell.row() as u64),
        )),
        Arc::new(BinaryArray::from_iter_values(geometries)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context(error::Arrow { path })?;

    let properties = WriterProperties::builder()
        .set_key_value_metadata(Some(vec![
            KeyValue::new(GEO_METADATA_KEY.to_owned(), geo_metadata(grid)?),
            KeyValue::new(CRS_METADATA_KEY.to_owned(), grid.crs().to_owned()),
        ]))
        .build();

    let mut writer =
        ArrowWriter::try_new(writer, schema, Some(properties)).context(error::Parquet { path })?;
    if batch.num_rows() > 0 {
        writer.write(&batch).context(error::Parquet { path })?;
    }
    writer.close().context(error::Parquet { path })?;

    Ok(())
}

fn geo_metadata(grid: &Grid) -> Result<String> {
    let column = GeometryColumn {
        encoding: WKB_ENCODING.to_owned(),
        geometry_types: vec!["Polygon".to_owned()],
        crs: None,
        bbox: grid.spatial_bounds().map(|bounds| {
            let ll = bounds.lower_left();
            let ur = bounds.upper_right();
            vec![ll.x, ll.y, ur.x, ur.y]
        }),
    };

    let metadata = GeoMetadata {
        version: GEOPARQUET_VERSION.to_owned(),
        primary_column: GEOMETRY_COLUMN.to_owned(),
        columns: HashMap::from([(GEOMETRY_COLUMN.to_owned(), column)]),
    };

    Ok(serde_json::to_string(&metadata)?)
}

/// Reads the points of a Parquet file.
///
/// Points come from the primary geometry column of the `geo` metadata, from a binary `geometry`
/// column, or else from the numeric columns `x_column` and `y_column`.
/// Non-point geometries and empty points are skipped.
pub fn read_points(path: &Path, x_column: &str, y_column: &str) -> Result<Vec<Coordinate2D>> {
    let file = File::open(path).context(error::Io { path })?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context(error::Parquet { path })?;

    let geo_metadata = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .and_then(|entries| entries.iter().find(|entry| entry.key == GEO_METADATA_KEY))
        .and_then(|entry| entry.value.as_deref())
        .map(serde_json::from_str::<GeoMetadata>)
        .transpose()
        .context(error::InvalidGeoMetadata { path })?;

    let columns = point_columns(builder.schema(), geo_metadata.as_ref(), x_column, y_column, path)?;
    tracing::debug!(path = %path.display(), ?columns, "reading points from parquet");

    let reader = builder.build().context(error::Parquet { path })?;

    let mut points = Vec::new();
    let mut first_row = 0;
    for batch in reader {
        let batch = batch.context(error::Arrow { path })?;

        match &columns {
            PointColumns::Wkb(column) => {
                collect_wkb_column(batch_column(&batch, column, path)?, column, path, &mut points)?;
            }
            PointColumns::Xy { x, y } => {
                let xs = float_column(&batch, x, path)?;
                let ys = float_column(&batch, y, path)?;

                for (offset, (x_value, y_value)) in xs.iter().zip(ys.iter()).enumerate() {
                    let row = first_row + offset;
                    points.push(Coordinate2D::new(
                        finite_value(x_value, row, x, path)?,
                        finite_value(y_value, row, y, path)?,
                    ));
                }
            }
        }

        first_row += batch.num_rows();
    }

    Ok(points)
}

fn point_columns(
    schema: &SchemaRef,
    geo_metadata: Option<&GeoMetadata>,
    x_column: &str,
    y_column: &str,
    path: &Path,
) -> Result<PointColumns> {
    if let Some(metadata) = geo_metadata {
        let column = metadata.columns.get(&metadata.primary_column).context(
            error::MissingColumn {
                path,
                column: &metadata.primary_column,
            },
        )?;

        ensure!(
            column.encoding.eq_ignore_ascii_case(WKB_ENCODING),
            error::UnsupportedGeometryEncoding {
                path,
                column: &metadata.primary_column,
                encoding: &column.encoding,
            }
        );

        return Ok(PointColumns::Wkb(metadata.primary_column.clone()));
    }

    let has_wkb_geometry = schema.field_with_name(GEOMETRY_COLUMN).is_ok_and(|field| {
        matches!(field.data_type(), DataType::Binary | DataType::LargeBinary)
    });

    if has_wkb_geometry {
        Ok(PointColumns::Wkb(GEOMETRY_COLUMN.to_owned()))
    } else {
        Ok(PointColumns::Xy {
            x: x_column.to_owned(),
            y: y_column.to_owned(),
        })
    }
}

fn batch_column<'b>(batch: &'b RecordBatch, column: &str, path: &Path) -> Result<&'b ArrayRef> {
    batch
        .column_by_name(column)
        .context(error::MissingColumn { path, column })
}

fn collect_wkb_column(
    values: &ArrayRef,
    column: &str,
    path: &Path,
    points: &mut Vec<Coordinate2D>,
) -> Result<()> {
    match values.data_type() {
        DataType::Binary => collect_wkb_points(values.as_binary::<i32>(), path, points),
        DataType::LargeBinary => collect_wkb_points(values.as_binary::<i64>(), path, points),
        data_type => error::UnsupportedColumnType {
            path,
            column,
            data_type: data_type.clone(),
        }
        .fail(),
    }
}

fn collect_wkb_points<O: OffsetSizeTrait>(
    values: &GenericBinaryArray<O>,
    path: &Path,
    points: &mut Vec<Coordinate2D>,
) -> Result<()> {
    for bytes in values.iter().flatten() {
        let geometry = Wkb::try_new(bytes).context(error::Wkb { path })?;
        collect_geometry_points(&geometry, points);
    }

    Ok(())
}

fn collect_geometry_points(geometry: &impl GeometryTrait<T = f64>, points: &mut Vec<Coordinate2D>) {
    match geometry.as_type() {
        GeometryType::Point(point) => push_point(point, points),
        GeometryType::MultiPoint(multi_point) => {
            for point in multi_point.points() {
                push_point(&point, points);
            }
        }
        GeometryType::GeometryCollection(collection) => {
            for geometry in collection.geometries() {
                collect_geometry_points(&geometry, points);
            }
        }
        _ => tracing::debug!("skipping non-point geometry"),
    }
}

fn push_point(point: &impl PointTrait<T = f64>, points: &mut Vec<Coordinate2D>) {
    let Some(coord) = PointTrait::coord(point) else {
        return;
    };

    // WKB encodes `POINT EMPTY` with NaN ordinates
    let coordinate = Coordinate2D::new(coord.x(), coord.y());
    if coordinate.is_finite() {
        points.push(coordinate);
    } else {
        tracing::debug!(%coordinate, "skipping empty point");
    }
}

fn float_column(batch: &RecordBatch, column: &str, path: &Path) -> Result<Float64Array> {
    let values = batch_column(batch, column, path)?;
    let values = arrow::compute::cast(values, &DataType::Float64).context(error::Arrow { path })?;

    Ok(values.as_primitive::<Float64Type>().clone())
}

fn finite_value(value: Option<f64>, row: usize, column: &str, path: &Path) -> Result<f64> {
    match value {
        Some(number) if number.is_finite() => Ok(number),
        _ => error::InvalidValue {
            path,
            row,
            column,
            value: value.map_or_else(|| "null".to_owned(), |number| number.to_string()),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use arrow::array::{Float32Array, StringArray};
    use arrow::datatypes::UInt64Type;
    use geo_traits::{LineStringTrait, PolygonTrait};
    use vectorgrid_datatypes::grid::build_grid;

    /// Little endian WKB of `POINT (x y)`
    fn wkb_point(x: f64, y: f64) -> Vec<u8> {
        let mut item = [0_u8; 21];
        item[0] = 0x01;
        item[1] = 0x01;
        item[5..13].copy_from_slice(&x.to_le_bytes());
        item[13..21].copy_from_slice(&y.to_le_bytes());
        item.to_vec()
    }

    fn write_parquet(path: &Path, batch: &RecordBatch, metadata: Option<Vec<KeyValue>>) {
        let properties = WriterProperties::builder()
            .set_key_value_metadata(metadata)
            .build();
        let mut writer = ArrowWriter::try_new(
            File::create(path).unwrap(),
            batch.schema(),
            Some(properties),
        )
        .unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
    }

    fn file_metadata(path: &Path, key: &str) -> Option<String> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap()).unwrap();

        builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .and_then(|entries| entries.iter().find(|entry| entry.key == key))
            .and_then(|entry| entry.value.clone())
    }

    #[test]
    fn it_writes_cells_as_wkb_polygons() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.parquet");
        let grid = build_grid(0., 0., 10., 10., 5., "EPSG:32632").unwrap();

        write_grid(&grid, File::create(&path).unwrap(), &path).unwrap();

        let batches: Vec<RecordBatch> =
            ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
                .unwrap()
                .build()
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.num_rows(), 4);

        let columns = batch.column_by_name("column").unwrap();
        let rows = batch.column_by_name("row").unwrap();
        assert_eq!(
            columns.as_primitive::<UInt64Type>().values().to_vec(),
            vec![0, 0, 1, 1]
        );
        assert_eq!(
            rows.as_primitive::<UInt64Type>().values().to_vec(),
            vec![0, 1, 0, 1]
        );

        let geometries = batch.column_by_name("geometry").unwrap().as_binary::<i32>();
        let geometry = Wkb::try_new(geometries.value(1)).unwrap();
        let GeometryType::Polygon(polygon) = geometry.as_type() else {
            panic!("expected a polygon");
        };
        let ring: Vec<(f64, f64)> = polygon
            .exterior()
            .unwrap()
            .coords()
            .map(|coord| (coord.x(), coord.y()))
            .collect();
        assert_eq!(ring, vec![(0., 5.), (5., 5.), (5., 10.), (0., 10.), (0., 5.)]);
    }

    #[test]
    fn it_writes_geo_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.parquet");
        let grid = build_grid(0., 0., 10., 10., 4., "ESRI:102001").unwrap();

        write_grid(&grid, File::create(&path).unwrap(), &path).unwrap();

        let geo: serde_json::Value =
            serde_json::from_str(&file_metadata(&path, "geo").unwrap()).unwrap();

        assert_eq!(geo["version"], "1.1.0");
        assert_eq!(geo["primary_column"], "geometry");
        assert_eq!(geo["columns"]["geometry"]["encoding"], "WKB");
        assert_eq!(
            geo["columns"]["geometry"]["geometry_types"],
            serde_json::json!(["Polygon"])
        );
        assert_eq!(geo["columns"]["geometry"]["crs"], serde_json::Value::Null);
        assert_eq!(
            geo["columns"]["geometry"]["bbox"],
            serde_json::json!([0., 0., 12., 12.])
        );

        assert_eq!(
            file_metadata(&path, CRS_METADATA_KEY).as_deref(),
            Some("ESRI:102001")
        );
    }

    #[test]
    fn it_writes_an_empty_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.parquet");
        let grid = build_grid(0., 0., 0., 10., 5., "X").unwrap();

        write_grid(&grid, File::create(&path).unwrap(), &path).unwrap();

        let geo: serde_json::Value =
            serde_json::from_str(&file_metadata(&path, "geo").unwrap()).unwrap();
        assert!(geo["columns"]["geometry"].get("bbox").is_none());

        let rows: usize = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
            .unwrap()
            .build()
            .unwrap()
            .map(|batch| batch.unwrap().num_rows())
            .sum();
        assert_eq!(rows, 0);
    }

    #[test]
    fn it_reads_wkb_points() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("geom", DataType::Binary, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["a", "b", "c", "d"])),
                Arc::new(BinaryArray::from(vec![
                    Some(wkb_point(8.77, 50.81).as_slice()),
                    None,
                    Some(wkb_point(f64::NAN, f64::NAN).as_slice()),
                    Some(wkb_point(9.93, 51.54).as_slice()),
                ])),
            ],
        )
        .unwrap();
        let geo = r#"{"version": "1.1.0", "primary_column": "geom",
            "columns": {"geom": {"encoding": "WKB", "geometry_types": ["Point"]}}}"#;
        write_parquet(
            &path,
            &batch,
            Some(vec![KeyValue::new("geo".to_owned(), geo.to_owned())]),
        );

        assert_eq!(
            read_points(&path, "x", "y").unwrap(),
            vec![Coordinate2D::new(8.77, 50.81), Coordinate2D::new(9.93, 51.54)]
        );
    }

    #[test]
    fn it_falls_back_to_a_binary_geometry_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new(
            "geometry",
            DataType::Binary,
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(BinaryArray::from_iter_values([
                wkb_point(1., 2.),
                wkb_point(3., 4.),
            ]))],
        )
        .unwrap();
        write_parquet(&path, &batch, None);

        assert_eq!(
            read_points(&path, "x", "y").unwrap(),
            vec![Coordinate2D::new(1., 2.), Coordinate2D::new(3., 4.)]
        );
    }

    #[test]
    fn it_reads_coordinate_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("lon", DataType::Float64, false),
            Field::new("lat", DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![8.5, 9.25])),
                Arc::new(Float32Array::from(vec![50.5, 51.25])),
            ],
        )
        .unwrap();
        write_parquet(&path, &batch, None);

        assert_eq!(
            read_points(&path, "lon", "lat").unwrap(),
            vec![Coordinate2D::new(8.5, 50.5), Coordinate2D::new(9.25, 51.25)]
        );

        assert!(matches!(
            read_points(&path, "x", "y"),
            Err(Error::MissingColumn { column, .. }) if column == "x"
        ));
    }

    #[test]
    fn it_rejects_missing_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("x", DataType::Float64, true),
            Field::new("y", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![Some(1.), Some(2.)])),
                Arc::new(Float64Array::from(vec![Some(1.), None])),
            ],
        )
        .unwrap();
        write_parquet(&path, &batch, None);

        assert!(matches!(
            read_points(&path, "x", "y"),
            Err(Error::InvalidValue { row: 1, column, .. }) if column == "y"
        ));
    }

    #[test]
    fn it_rejects_unsupported_encodings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new(
            "geometry",
            DataType::Binary,
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(BinaryArray::from_iter_values([wkb_point(1., 2.)]))],
        )
        .unwrap();
        let geo = r#"{"version": "1.1.0", "primary_column": "geometry",
            "columns": {"geometry": {"encoding": "point", "geometry_types": ["Point"]}}}"#;
        write_parquet(
            &path,
            &batch,
            Some(vec![KeyValue::new("geo".to_owned(), geo.to_owned())]),
        );

        assert!(matches!(
            read_points(&path, "x", "y"),
            Err(Error::UnsupportedGeometryEncoding { encoding, .. }) if encoding == "point"
        ));
    }
}
