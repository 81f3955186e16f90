use snafu::Snafu;
use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))] // disables default `Snafu` suffix
pub enum Error {
    #[snafu(display("{}", source))]
    DataType {
        source: vectorgrid_datatypes::error::Error,
    },

    #[snafu(display("Invalid configuration: {}", source))]
    Config {
        source: config::ConfigError,
    },

    ConfigLockFailed,

    #[snafu(display("Unable to determine the working directory: {}", source))]
    MissingWorkingDirectory {
        source: std::io::Error,
    },

    #[snafu(display("Unable to access `{}`: {}", path.display(), source))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to read CSV file `{}`: {}", path.display(), source))]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },

    #[snafu(display("Unable to read GeoJSON file `{}`: {}", path.display(), source))]
    GeoJson {
        path: PathBuf,
        source: geojson::Error,
    },

    #[snafu(display("Unable to access Parquet file `{}`: {}", path.display(), source))]
    Parquet {
        path: PathBuf,
        source: parquet::errors::ParquetError,
    },

    #[snafu(display("Invalid Arrow data in `{}`: {}", path.display(), source))]
    Arrow {
        path: PathBuf,
        source: arrow::error::ArrowError,
    },

    #[snafu(display("Invalid WKB geometry in `{}`: {}", path.display(), source))]
    Wkb {
        path: PathBuf,
        source: wkb::error::WkbError,
    },

    #[snafu(display("Invalid `geo` metadata in `{}`: {}", path.display(), source))]
    InvalidGeoMetadata {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display(
        "Geometry column `{}` of `{}` is encoded as `{}`, only WKB is supported",
        column,
        path.display(),
        encoding
    ))]
    UnsupportedGeometryEncoding {
        path: PathBuf,
        column: String,
        encoding: String,
    },

    #[snafu(display(
        "Column `{}` of `{}` has type {}, but binary WKB is required",
        column,
        path.display(),
        data_type
    ))]
    UnsupportedColumnType {
        path: PathBuf,
        column: String,
        data_type: arrow::datatypes::DataType,
    },

    #[snafu(display(
        "Value `{}` in row {} column `{}` of `{}` is not a finite number",
        value,
        row,
        column,
        path.display()
    ))]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[snafu(display("Unable to serialize JSON: {}", source))]
    SerdeJson {
        source: serde_json::Error,
    },

    #[snafu(display("Column `{}` is missing in `{}`", column, path.display()))]
    MissingColumn {
        path: PathBuf,
        column: String,
    },

    #[snafu(display(
        "Value `{}` in line {} column `{}` is not a number",
        value,
        line,
        column
    ))]
    InvalidNumber {
        value: String,
        line: u64,
        column: String,
    },

    #[snafu(display("`{}` does not contain any points", path.display()))]
    EmptyPointSet {
        path: PathBuf,
    },

    #[snafu(display(
        "Cannot infer the file format of `{}`, please specify it explicitly",
        path.display()
    ))]
    UnknownFileFormat {
        path: PathBuf,
    },

    #[snafu(display(
        "Bounds must be given as `xmin,ymin,xmax,ymax`, but are `{}`",
        bounds
    ))]
    InvalidBounds {
        bounds: String,
    },

    #[snafu(display("Either bounds or a point file must be given"))]
    MissingExtent,

    #[snafu(display("Output `{}` already exists", path.display()))]
    OutputExists {
        path: PathBuf,
    },

    #[snafu(display(
        "Only GeoParquet output can be validated, but the output format is {:?}",
        format
    ))]
    ValidationUnsupported {
        format: crate::output::OutputFormat,
    },

    #[snafu(display("Input file `{}` does not exist", path.display()))]
    MissingInputFile {
        path: PathBuf,
    },

    #[snafu(display("Unable to run validator `{}`: {}", program, source))]
    ValidatorSpawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("Validation of `{}` failed ({}): {}", path.display(), status, stderr))]
    ValidationFailed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

impl From<vectorgrid_datatypes::error::Error> for Error {
    fn from(source: vectorgrid_datatypes::error::Error) -> Self {
        Error::DataType { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::SerdeJson { source }
    }
}
