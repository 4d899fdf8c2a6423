//! Topology assembly error types.

use thiserror::Error;

/// Errors that abort an assembly. No partial graph is ever returned;
/// the build either yields a complete topology or fails entirely.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("duplicate service identifier: {0}")]
    DuplicateService(String),

    #[error("configuration error: {0}")]
    Config(#[from] gridplane_core::ConfigError),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
