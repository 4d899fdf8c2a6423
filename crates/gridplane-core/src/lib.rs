//! gridplane-core: shared types for the grid topology assembler.
//!
//! Holds the sparse deployment options (loadable from `grid.toml`), the
//! defaulting layer that resolves them into a complete [`GridConfig`],
//! the browser flavor registry, and the fixed protocol constants shared
//! by every downstream crate.

pub mod config;
pub mod flavor;

pub use config::{ConfigError, GridConfig, GridOptions, NetworkRef};
pub use flavor::BrowserFlavor;

/// Client-facing coordination port. Automation clients connect here,
/// both on the hub container and on the shared load balancer.
pub const GRID_PORT: u16 = 4444;

/// Internal port a node listens on and advertises back to the hub
/// when it registers itself at boot.
pub const NODE_REGISTRATION_PORT: u16 = 5555;
