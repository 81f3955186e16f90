use clap::{Parser, Subcommand};
use vectorgrid_services::cli::{
    CreateGrid, Extent, Validate, create_grid, print_extent, validate,
};
use vectorgrid_services::logging::init_logging;

/// Creates vector grids of square cells
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Overrides the `logging.log_spec` setting, e.g. `debug`
    #[arg(long, global = true)]
    log_spec: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Creates a grid of square cells covering an extent
    Grid(CreateGrid),

    /// Prints the extent of a point file as JSON
    Extent(Extent),

    /// Runs the configured validator on a file
    Validate(Validate),
}

impl Commands {
    fn execute(self) -> Result<(), anyhow::Error> {
        match self {
            Commands::Grid(params) => create_grid(params)?,
            Commands::Extent(params) => print_extent(params)?,
            Commands::Validate(params) => validate(params)?,
        }

        Ok(())
    }
}

#[allow(clippy::print_stderr)]
fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_spec.as_deref()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    if let Err(err) = cli.command.execute() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
