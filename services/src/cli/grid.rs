use super::extent::PointArgs;
use crate::config::{self, get_config_element};
use crate::error::{self, Result};
use crate::output::{OnConflict, OutputFormat, WriteOutcome, write_grid};
use crate::points::point_extent;
use crate::validator::validate_file;
use clap::{ArgGroup, Parser, ValueEnum};
use snafu::ensure;
use std::path::PathBuf;
use vectorgrid_datatypes::grid::{EdgePolicy, GridBuilder};
use vectorgrid_datatypes::primitives::{BoundingBox2D, CellSize};

/// Creates a grid of square cells covering an extent
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("extent").required(true).args(["bounds", "points"])))]
pub struct CreateGrid {
    /// Extent as `xmin,ymin,xmax,ymax`
    #[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
    bounds: Option<BoundingBox2D>,

    /// Uses the extent of the points in this file
    #[arg(long)]
    points: Option<PathBuf>,

    #[command(flatten)]
    point_args: PointArgs,

    /// Edge length of the cells in units of the CRS
    #[arg(long, allow_negative_numbers = true)]
    cell_size: f64,

    /// Label of the coordinate reference system, e.g. `EPSG:32632`
    #[arg(long)]
    crs: String,

    /// Output file
    #[arg(long, short)]
    output: PathBuf,

    /// Output format, inferred from the extension if omitted
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(long, value_enum, default_value_t = OnConflict::Fail)]
    on_conflict: OnConflict,

    /// Overrides the `grid.edge_policy` setting
    #[arg(long, value_enum)]
    edge_policy: Option<EdgePolicyArg>,

    /// Overrides the `grid.max_cells` setting
    #[arg(long)]
    max_cells: Option<usize>,

    /// Runs the configured GeoParquet validator on the written file
    #[arg(long)]
    validate: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EdgePolicyArg {
    /// The last origin of each axis is dropped
    Legacy,
    /// Cells cover the whole extent
    Cover,
}

impl From<EdgePolicyArg> for EdgePolicy {
    fn from(value: EdgePolicyArg) -> Self {
        match value {
            EdgePolicyArg::Legacy => EdgePolicy::Legacy,
            EdgePolicyArg::Cover => EdgePolicy::Cover,
        }
    }
}

/// Parses `xmin,ymin,xmax,ymax`
pub fn parse_bounds(bounds: &str) -> Result<BoundingBox2D> {
    let values = bounds
        .split(',')
        .map(|value| value.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>();

    match values.as_deref() {
        Ok(&[xmin, ymin, xmax, ymax]) => Ok(BoundingBox2D::from_extrema(xmin, ymin, xmax, ymax)?),
        _ => error::InvalidBounds { bounds }.fail(),
    }
}

pub fn create_grid(params: CreateGrid) -> Result<()> {
    let format = match params.format {
        Some(format) => format,
        None => OutputFormat::from_path(&params.output)?,
    };

    ensure!(
        !params.validate || format == OutputFormat::GeoParquet,
        error::ValidationUnsupported { format }
    );

    let bbox = match (params.bounds, &params.points) {
        (Some(bounds), _) => bounds,
        (None, Some(points)) => point_extent(points, &params.point_args.options()?)?,
        (None, None) => return error::MissingExtent.fail(),
    };

    let grid_config: config::Grid = get_config_element()?;
    let mut builder = GridBuilder::from(&grid_config);
    if let Some(max_cells) = params.max_cells {
        builder = builder.with_max_cells(max_cells);
    }
    if let Some(edge_policy) = params.edge_policy {
        builder = builder.with_edge_policy(edge_policy.into());
    }

    let cell_size = CellSize::new(params.cell_size)?;

    tracing::info!(
        ?bbox,
        %cell_size,
        crs = %params.crs,
        edge_policy = %builder.edge_policy(),
        "building grid"
    );

    let grid = builder.build(bbox, cell_size, params.crs)?;

    tracing::info!(
        cells = grid.len(),
        columns = grid.columns(),
        rows = grid.rows(),
        "built grid"
    );

    let outcome = write_grid(&grid, &params.output, format, params.on_conflict)?;

    if params.validate && outcome == WriteOutcome::Written {
        let validator: config::Validator = get_config_element()?;
        validate_file(&params.output, &validator)?;
    }

    Ok(())
}
