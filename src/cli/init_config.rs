//! Init-config command implementation.

use std::path::Path;

use units::SimConfig;
use units::config::CONFIG_FILE_NAME;

use super::CliError;

/// Write the default config into `dir`.
///
/// Refuses to overwrite an existing file.
///
/// # Errors
///
/// Returns an error if the file exists or cannot be written.
pub(crate) fn execute(dir: &Path) -> Result<(), CliError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(CliError::new(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }

    SimConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
