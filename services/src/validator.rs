use crate::config;
use crate::error::{self, Result};
use snafu::{ResultExt, ensure};
use std::path::Path;
use std::process::Command;

/// Runs the external validator on `path`.
///
/// The program is invoked as `<interpreter> <script> <args...> <path>` without a shell.
/// Its `STDOUT` is logged, a non-zero exit status fails with the captured `STDERR`.
pub fn validate_file(path: &Path, validator: &config::Validator) -> Result<()> {
    ensure!(path.exists(), error::MissingInputFile { path });

    tracing::info!(
        path = %path.display(),
        script = %validator.script.display(),
        "validating"
    );

    let output = Command::new(&validator.interpreter)
        .arg(&validator.script)
        .args(&validator.args)
        .arg(path)
        .output()
        .context(error::ValidatorSpawn {
            program: &validator.interpreter,
        })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        tracing::info!(target: "validator", "{line}");
    }

    ensure!(
        output.status.success(),
        error::ValidationFailed {
            path,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim(),
        }
    );

    tracing::info!(path = %path.display(), "validation succeeded");

    Ok(())
}
