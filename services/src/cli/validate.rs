use crate::config::{self, get_config_element};
use crate::error::Result;
use crate::validator::validate_file;
use clap::Parser;
use std::path::PathBuf;

/// Runs the configured validator on a file
#[derive(Debug, Parser)]
pub struct Validate {
    /// File to validate
    path: PathBuf,

    /// Overrides the `validator.interpreter` setting
    #[arg(long)]
    interpreter: Option<String>,

    /// Overrides the `validator.script` setting
    #[arg(long)]
    script: Option<PathBuf>,
}

pub fn validate(params: Validate) -> Result<()> {
    let mut validator: config::Validator = get_config_element()?;

    if let Some(interpreter) = params.interpreter {
        validator.interpreter = interpreter;
    }
    if let Some(script) = params.script {
        validator.script = script;
    }

    validate_file(&params.path, &validator)
}
