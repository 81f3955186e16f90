use crate::error::{self, Result};
use crate::geoparquet;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use vectorgrid_datatypes::grid::Grid;

/// File formats a grid can be written as
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A `FeatureCollection` of polygons
    #[value(name = "geojson")]
    GeoJson,
    /// One row per cell with the polygon as WKT
    Csv,
    /// One row per cell with the polygon as WKB and `geo` file metadata
    #[value(name = "geoparquet")]
    GeoParquet,
}

impl OutputFormat {
    /// Infers the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("geojson" | "json") => Ok(OutputFormat::GeoJson),
            Some("csv") => Ok(OutputFormat::Csv),
            Some("parquet" | "geoparquet") => Ok(OutputFormat::GeoParquet),
            _ => error::UnknownFileFormat { path }.fail(),
        }
    }
}

/// What to do if the output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum OnConflict {
    #[default]
    Fail,
    Overwrite,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file existed and was left untouched
    Skipped,
}

/// Writes `grid` to `path`.
///
/// The grid is written to a temporary file in the directory of `path` and then moved into place,
/// so a failed write leaves `path` untouched. Unless `on_conflict` is `Overwrite`, a file created
/// at `path` in the meantime is never replaced.
pub fn write_grid(
    grid: &Grid,
    path: &Path,
    format: OutputFormat,
    on_conflict: OnConflict,
) -> Result<WriteOutcome> {
    if path.exists() {
        match on_conflict {
            OnConflict::Fail => return error::OutputExists { path }.fail(),
            OnConflict::Skip => {
                tracing::info!(path = %path.display(), "output exists, skipping");
                return Ok(WriteOutcome::Skipped);
            }
            OnConflict::Overwrite => {
                tracing::info!(path = %path.display(), "output exists, overwriting");
            }
        }
    }

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory).context(error::Io { path: directory })?;

    match format {
        OutputFormat::GeoJson => {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &grid.to_feature_collection())?;
            writer.flush().context(error::Io { path })?;
        }
        OutputFormat::Csv => {
            write_csv(grid, BufWriter::new(file.as_file_mut())).context(error::Csv { path })?;
        }
        OutputFormat::GeoParquet => geoparquet::write_grid(grid, file.as_file_mut(), path)?,
    }

    let outcome = persist(file, path, on_conflict)?;

    if outcome == WriteOutcome::Written {
        tracing::info!(
            path = %path.display(),
            ?format,
            cells = grid.len(),
            "wrote grid"
        );
    }

    Ok(outcome)
}

/// Moves the finished temporary `file` to `path`
fn persist(file: NamedTempFile, path: &Path, on_conflict: OnConflict) -> Result<WriteOutcome> {
    let persisted = match on_conflict {
        OnConflict::Overwrite => file.persist(path),
        OnConflict::Fail | OnConflict::Skip => file.persist_noclobber(path),
    };

    match persisted {
        Ok(_) => Ok(WriteOutcome::Written),
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => match on_conflict {
            OnConflict::Skip => {
                tracing::info!(path = %path.display(), "output appeared while writing, skipping");
                Ok(WriteOutcome::Skipped)
            }
            OnConflict::Fail | OnConflict::Overwrite => error::OutputExists { path }.fail(),
        },
        Err(err) => Err(err.error).context(error::Io { path }),
    }
}

fn write_csv<W: Write>(grid: &Grid, writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["id", "column", "row", "geometry"])?;

    for (id, cell) in grid.iter().enumerate() {
        writer.write_record([
            id.to_string(),
            cell.column().to_string(),
            cell.row().to_string(),
            cell.wkt_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
