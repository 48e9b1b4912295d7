//! Config facade: single entry point for loading and validating configuration.

use crate::config::merge_policy;
use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::PvelistConfig;
use crate::error::ApiError;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the user config file and `PVELIST_*` environment overrides.
    pub fn load() -> Result<PvelistConfig, ApiError> {
        Self::load_layers(None)
    }

    /// Like `load`, with `path` layered above the user config file.
    pub fn load_from_file(path: &Path) -> Result<PvelistConfig, ApiError> {
        Self::load_layers(Some(path))
    }

    fn load_layers(path: Option<&Path>) -> Result<PvelistConfig, ApiError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = path {
            builder = explicit_file::add_to_builder(builder, path)?;
        }
        builder = environment::add_to_builder(builder);

        let config: PvelistConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}
