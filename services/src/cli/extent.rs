use crate::error::Result;
use crate::points::{PointFormat, PointOptions, point_extent};
use clap::{Args, Parser};
use std::path::PathBuf;

/// How points are read from a file
#[derive(Debug, Clone, Args)]
pub struct PointArgs {
    /// Column of the x coordinate in CSV or plain Parquet input [default: `points.x_column` setting]
    #[arg(long)]
    x_column: Option<String>,

    /// Column of the y coordinate in CSV or plain Parquet input [default: `points.y_column` setting]
    #[arg(long)]
    y_column: Option<String>,

    /// Exchanges x and y of every point, e.g. for `lat,lon` ordered input
    #[arg(long)]
    swap_xy: bool,

    /// Format of the point file, inferred from the extension if omitted
    #[arg(long, value_enum)]
    point_format: Option<PointFormat>,
}

impl PointArgs {
    pub fn options(&self) -> Result<PointOptions> {
        let mut options = PointOptions::from_config()?;

        if let Some(x_column) = &self.x_column {
            options.x_column.clone_from(x_column);
        }
        if let Some(y_column) = &self.y_column {
            options.y_column.clone_from(y_column);
        }
        options.swap_xy = self.swap_xy;
        options.format = self.point_format;

        Ok(options)
    }
}

/// Prints the extent of a point file as JSON
#[derive(Debug, Parser)]
pub struct Extent {
    /// Point file
    path: PathBuf,

    #[command(flatten)]
    point_args: PointArgs,
}

#[allow(clippy::print_stdout)]
pub fn print_extent(params: Extent) -> Result<()> {
    let extent = point_extent(&params.path, &params.point_args.options()?)?;

    let lower_left = extent.lower_left();
    let upper_right = extent.upper_right();

    println!(
        "{}",
        serde_json::json!({
            "xmin": lower_left.x,
            "ymin": lower_left.y,
            "xmax": upper_right.x,
            "ymax": upper_right.y,
        })
    );

    Ok(())
}
