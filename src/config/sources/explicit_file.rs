//! Explicit config file source passed with `--config`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Add a required config file. A missing file is an error, unlike the global file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(format!(
            "config file {}",
            path.display()
        )));
    }
    Ok(builder.add_source(File::from(path).required(true)))
}
