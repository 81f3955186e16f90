use crate::error::{self, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use snafu::ResultExt;
use std::path::PathBuf;
use std::sync::{LazyLock, RwLock};
use vectorgrid_datatypes::grid::{EdgePolicy, GridBuilder};

const DEFAULT_SETTINGS: &str = include_str!("../../Settings-default.toml");

static SETTINGS: LazyLock<RwLock<Config>> = LazyLock::new(init_settings);

fn init_settings() -> RwLock<Config> {
    let mut settings =
        Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

    #[cfg(test)]
    let files = ["Settings-test.toml"];

    #[cfg(not(test))]
    let files = ["Settings.toml"];

    if let Ok(dir) = retrieve_settings_dir() {
        let files: Vec<File<_, _>> = files
            .iter()
            .map(|f| dir.join(f))
            .filter(|p| p.exists())
            .map(File::from)
            .collect();

        settings = settings.add_source(files);
    }

    // Override config with environment variables that start with `VECTORGRID__`,
    // e.g. `VECTORGRID__LOGGING__LOG_SPEC=debug`
    // Note: Since variables contain underscores, we need to use something different
    // for separating groups, for instance double underscores `__`
    settings = settings.add_source(Environment::with_prefix("vectorgrid").separator("__"));

    RwLock::new(
        settings
            .build()
            .expect("it should crash the program if this fails"),
    )
}

/// test may run in subdirectory
#[cfg(test)]
fn retrieve_settings_dir() -> Result<PathBuf> {
    const MAX_PARENT_DIRS: usize = 1;

    let mut settings_dir = std::env::current_dir().context(error::MissingWorkingDirectory)?;

    for _ in 0..=MAX_PARENT_DIRS {
        if settings_dir.join("Settings-default.toml").exists() {
            return Ok(settings_dir);
        }

        // go to parent directory
        if !settings_dir.pop() {
            break;
        }
    }

    std::env::current_dir().context(error::MissingWorkingDirectory)
}

#[cfg(not(test))]
fn retrieve_settings_dir() -> Result<PathBuf> {
    std::env::current_dir().context(error::MissingWorkingDirectory)
}

#[cfg(test)]
pub fn set_config<T>(key: &str, value: T) -> Result<()>
where
    T: Into<config::Value>,
{
    let mut settings = SETTINGS
        .write()
        .map_err(|_error| error::Error::ConfigLockFailed)?;

    let builder = Config::builder()
        .add_source(settings.clone())
        .set_override(key, value)
        .context(error::Config)?;

    *settings = builder.build().context(error::Config)?;
    Ok(())
}

pub fn get_config<'a, T>(key: &str) -> Result<T>
where
    T: Deserialize<'a>,
{
    SETTINGS
        .read()
        .map_err(|_error| error::Error::ConfigLockFailed)?
        .get::<T>(key)
        .context(error::Config)
}

pub fn get_config_element<'a, T>() -> Result<T>
where
    T: ConfigElement + Deserialize<'a>,
{
    get_config(T::KEY)
}

pub trait ConfigElement {
    const KEY: &'static str;
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    pub log_spec: String,
}

impl ConfigElement for Logging {
    const KEY: &'static str = "logging";
}

#[derive(Debug, Deserialize)]
pub struct Grid {
    pub max_cells: usize,
    pub edge_policy: EdgePolicy,
}

impl ConfigElement for Grid {
    const KEY: &'static str = "grid";
}

impl From<&Grid> for GridBuilder {
    fn from(grid: &Grid) -> GridBuilder {
        GridBuilder::new()
            .with_max_cells(grid.max_cells)
            .with_edge_policy(grid.edge_policy)
    }
}

/// Column names of point coordinates in delimited text files
#[derive(Debug, Deserialize)]
pub struct Points {
    pub x_column: String,
    pub y_column: String,
}

impl ConfigElement for Points {
    const KEY: &'static str = "points";
}

/// The external script that checks produced files
#[derive(Debug, Clone, Deserialize)]
pub struct Validator {
    pub interpreter: String,
    pub script: PathBuf,
    pub args: Vec<String>,
}

impl ConfigElement for Validator {
    const KEY: &'static str = "validator";
}
