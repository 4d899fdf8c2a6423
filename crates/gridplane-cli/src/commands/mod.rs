pub mod config;
pub mod plan;

use std::path::Path;

use anyhow::Context;
use gridplane_core::GridOptions;

/// Load sparse options from the given path, or start from an empty
/// set when no file is supplied.
pub(crate) fn load_options(config_path: Option<&str>) -> anyhow::Result<GridOptions> {
    match config_path {
        Some(path) => GridOptions::from_file(Path::new(path))
            .with_context(|| format!("failed to load {path}")),
        None => Ok(GridOptions::default()),
    }
}
