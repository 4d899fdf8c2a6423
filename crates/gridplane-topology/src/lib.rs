//! gridplane-topology: the resource-topology assembler.
//!
//! Builds the desired-state graph for a browser-automation grid: the
//! shared network boundary and load balancer, one hub service, one
//! node service per registered browser flavor, and a scaling policy
//! per service. The build is a single synchronous tree-construction
//! pass; the external compute platform materializes the result.
//!
//! # Architecture
//!
//! - [`resources`] — plain serializable resource specs
//! - [`network`] — shared network boundary + load balancer
//! - [`composer`] — one descriptor in, one provisioned service out
//! - [`assembler`] — wires hub, nodes, and policies together

pub mod assembler;
pub mod composer;
pub mod error;
pub mod network;
pub mod resources;

pub use assembler::{
    assemble, assemble_with_discovery, plan, AddressDiscovery, GridTopology,
    NodeService,
};
pub use composer::{compose_service, ComposedService, ServiceDescriptor};
pub use error::{TopologyError, TopologyResult};
pub use network::{provision_network, NetworkContext};
pub use resources::*;
