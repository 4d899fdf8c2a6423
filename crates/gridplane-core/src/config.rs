//! grid.toml parsing and configuration defaulting.
//!
//! [`GridOptions`] is the sparse, user-facing shape: every field is
//! optional. [`GridOptions::resolve`] applies the default table and
//! fail-fast validation, producing an immutable [`GridConfig`] in which
//! every field is concrete. Downstream crates only ever see the
//! resolved form.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::flavor::BrowserFlavor;

/// Pinned known-good release tag applied to hub and node images.
pub const DEFAULT_SELENIUM_VERSION: &str = "3.141.59";

/// Per-container memory ceiling in MiB.
pub const DEFAULT_MEMORY_MIB: u32 = 512;

/// Per-container CPU ceiling in abstract compute units.
pub const DEFAULT_CPU_UNITS: u32 = 256;

/// Same-browser parallel instances per node container.
pub const DEFAULT_NODE_MAX_INSTANCES: u32 = 5;

/// Total concurrent sessions per node container.
pub const DEFAULT_NODE_MAX_SESSIONS: u32 = 5;

/// Errors raised while loading or resolving the grid configuration.
///
/// All of these fire before any resource is described; a partial
/// topology is never produced from an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("memory must be greater than zero")]
    ZeroMemory,

    #[error("cpu must be greater than zero")]
    ZeroCpu,

    #[error("node_max_instances must be at least 1")]
    ZeroMaxInstances,

    #[error("node_max_sessions must be at least 1")]
    ZeroMaxSessions,

    #[error("at least one browser flavor must be registered")]
    NoBrowsers,
}

/// Reference to the network boundary the grid lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkRef {
    /// A network created for the grid, with the given number of NAT
    /// egress paths.
    Managed { nat_gateways: u32 },
    /// An existing network supplied by the caller.
    Existing { id: String },
}

impl Default for NetworkRef {
    fn default() -> Self {
        NetworkRef::Managed { nat_gateways: 1 }
    }
}

/// Sparse deployment options, as read from `grid.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridOptions {
    /// Network to deploy into. Default: a new managed network.
    pub network: Option<NetworkRef>,
    /// Image tag pinned across hub and node containers, ex: 3.141.59.
    pub selenium_version: Option<String>,
    /// Memory ceiling in MiB for hub and node containers, ex: 512.
    pub memory: Option<u32>,
    /// CPU ceiling for hub and node containers, ex: 256.
    pub cpu: Option<u32>,
    /// Instances of the same browser version that can run in one node.
    pub node_max_instances: Option<u32>,
    /// Browsers (any flavor) that can run in parallel in one node.
    pub node_max_sessions: Option<u32>,
    /// Browser flavors to provision node services for.
    pub browsers: Option<Vec<BrowserFlavor>>,
}

impl GridOptions {
    /// Load sparse options from a `grid.toml` file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let options: GridOptions = toml::from_str(&content)?;
        Ok(options)
    }

    /// Resolve into a complete [`GridConfig`], applying the default
    /// table and rejecting out-of-range values.
    pub fn resolve(self) -> Result<GridConfig, ConfigError> {
        let config = GridConfig {
            network: self.network.unwrap_or_default(),
            selenium_version: self
                .selenium_version
                .unwrap_or_else(|| DEFAULT_SELENIUM_VERSION.to_string()),
            memory_mib: self.memory.unwrap_or(DEFAULT_MEMORY_MIB),
            cpu_units: self.cpu.unwrap_or(DEFAULT_CPU_UNITS),
            node_max_instances: self
                .node_max_instances
                .unwrap_or(DEFAULT_NODE_MAX_INSTANCES),
            node_max_sessions: self
                .node_max_sessions
                .unwrap_or(DEFAULT_NODE_MAX_SESSIONS),
            browsers: self
                .browsers
                .unwrap_or_else(BrowserFlavor::default_registry),
        };

        if config.memory_mib == 0 {
            return Err(ConfigError::ZeroMemory);
        }
        if config.cpu_units == 0 {
            return Err(ConfigError::ZeroCpu);
        }
        if config.node_max_instances == 0 {
            return Err(ConfigError::ZeroMaxInstances);
        }
        if config.node_max_sessions == 0 {
            return Err(ConfigError::ZeroMaxSessions);
        }
        if config.browsers.is_empty() {
            return Err(ConfigError::NoBrowsers);
        }

        Ok(config)
    }
}

/// Resolved grid configuration. Every field is concrete; no field is
/// ever absent downstream of [`GridOptions::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridConfig {
    pub network: NetworkRef,
    pub selenium_version: String,
    pub memory_mib: u32,
    pub cpu_units: u32,
    pub node_max_instances: u32,
    pub node_max_sessions: u32,
    pub browsers: Vec<BrowserFlavor>,
}
