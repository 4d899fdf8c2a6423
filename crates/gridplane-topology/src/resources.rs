//! Desired-state resource specs.
//!
//! These types are the vocabulary of the emitted graph: pure data,
//! JSON-serializable, with deterministic ordering (`BTreeMap` for
//! environment maps). Nothing here talks to a platform; the graph is
//! handed to the external compute platform for materialization.

use serde::Serialize;
use std::collections::BTreeMap;

use gridplane_core::NetworkRef;

// ── Network ───────────────────────────────────────────────────────

/// The network boundary the grid is provisioned into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSpec {
    pub name: String,
    pub source: NetworkRef,
}

// ── Cluster ───────────────────────────────────────────────────────

/// Compute capacity class backing the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityProvider {
    /// Guaranteed, stable capacity.
    Standard,
    /// Cost-efficient, interruptible capacity.
    Spot,
}

/// One entry of the cluster's capacity strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityProviderEntry {
    pub provider: CapacityProvider,
    /// Relative share of demand above `base` routed to this provider.
    pub weight: u32,
    /// Units always satisfied by this provider before weights apply.
    pub base: u32,
}

/// The compute cluster every grid service is attached to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSpec {
    pub name: String,
    pub capacity_strategy: Vec<CapacityProviderEntry>,
}

// ── Security ──────────────────────────────────────────────────────

/// Connection-oriented transport for port mappings and target
/// registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Tcp,
}

/// Source address range an ingress rule admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerSource {
    AnyIpv4,
}

/// One inbound rule on the security boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngressRule {
    pub port: u16,
    pub protocol: Protocol,
    pub source: PeerSource,
    pub description: String,
}

/// The shared security boundary for every grid service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityGroupSpec {
    pub name: String,
    pub allow_all_outbound: bool,
    pub ingress: Vec<IngressRule>,
}

// ── Load balancer ─────────────────────────────────────────────────

/// Application-layer protocol a listener speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerProtocol {
    Http,
}

/// A service registered as a listener target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRegistration {
    pub service: String,
    pub container: String,
    pub port: u16,
    pub protocol: Protocol,
}

/// A listener on the shared load balancer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listener {
    pub port: u16,
    pub protocol: ListenerProtocol,
    pub targets: Vec<TargetRegistration>,
}

/// The internet-facing load balancer shared by the grid.
///
/// Created once by the network provisioner; the only mutation allowed
/// afterwards is appending listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadBalancerSpec {
    pub name: String,
    pub internet_facing: bool,
    pub security_groups: Vec<String>,
    pub listeners: Vec<Listener>,
}

impl LoadBalancerSpec {
    /// Symbolic token for the balancer's public address.
    ///
    /// The address does not exist until the platform materializes the
    /// graph; the token is substituted at deploy time. Stable for a
    /// given balancer name, so it can be referenced from service
    /// environments and named outputs before deployment.
    pub fn dns_name(&self) -> String {
        format!("${{{}.dns}}", self.name)
    }
}

// ── Task and service ──────────────────────────────────────────────

/// Container port exposed on the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
    pub protocol: Protocol,
}

/// The single container a grid task runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub essential: bool,
    pub environment: BTreeMap<String, String>,
    pub port_mappings: Vec<PortMapping>,
    pub log_stream_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

/// A task definition: exactly one container per grid task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDefinitionSpec {
    pub family: String,
    pub container: ContainerSpec,
}

/// Health-based rolling-update policy.
///
/// With max at 100%, the deployment must shrink before it can grow
/// back; replace-before-add is disallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeploymentPolicy {
    pub min_healthy_percent: u32,
    pub max_healthy_percent: u32,
}

/// A managed, autoscalable service bound to one task definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceSpec {
    pub name: String,
    pub cluster: String,
    pub task_definition: String,
    pub deployment: DeploymentPolicy,
    pub security_groups: Vec<String>,
}

/// Handle to a composed service, used for load-balancer registration
/// and scaling-policy binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionedService {
    pub service_name: String,
    pub container_name: String,
    pub cluster_name: String,
    pub task_family: String,
}
