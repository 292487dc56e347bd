//! Command implementations.

mod info;
mod run;
mod scan;
mod validate;

pub use info::run_info;
pub use run::run_pipeline;
pub use scan::run_scan;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;
use tracing::info;

/// Loads `path`, or the validated defaults when no file is given.
pub(crate) fn load_blueprint(path: Option<&Path>) -> Result<PipelineBlueprint> {
    match path {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            info!("No configuration file given, using defaults");
            let blueprint = PipelineBlueprint::default();
            config_loader::ConfigLoader::validate(&blueprint)
                .context("Default configuration is invalid")?;
            Ok(blueprint)
        }
    }
}
