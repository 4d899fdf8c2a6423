//! Service composer: one descriptor in, one provisioned service out.
//!
//! Used identically for the hub and for every node flavor; the only
//! variation between services lives in the [`ServiceDescriptor`].

use std::collections::BTreeMap;

use tracing::debug;

use gridplane_core::{GridConfig, GRID_PORT};

use crate::network::NetworkContext;
use crate::resources::{
    ContainerSpec, DeploymentPolicy, PortMapping, Protocol, ProvisionedService,
    ServiceSpec, TaskDefinitionSpec,
};

/// Never let healthy capacity fall below this share of desired count
/// during a rolling update.
pub const MIN_HEALTHY_PERCENT: u32 = 75;

/// Never exceed desired count during a rolling update; the deployment
/// shrinks before it grows back.
pub const MAX_HEALTHY_PERCENT: u32 = 100;

/// Declarative input to the composer. Constructed, consumed once,
/// discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    pub identifier: String,
    pub image: String,
    /// Plain-string environment; keys unique, no secrets.
    pub environment: BTreeMap<String, String>,
    pub entry_point: Option<Vec<String>>,
    pub command: Option<Vec<String>>,
}

/// Composer output: the task definition and service specs to emit,
/// plus the handle downstream wiring refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedService {
    pub task_definition: TaskDefinitionSpec,
    pub service: ServiceSpec,
    pub handle: ProvisionedService,
}

/// Build one task/container specification and one managed service from
/// a descriptor.
///
/// The container gets its cpu/memory ceilings from the resolved
/// configuration, a single 4444-to-4444 TCP port mapping, and a log
/// stream prefixed by the service identifier. The service attaches to
/// the shared cluster and security boundary with the health-based
/// deployment policy.
pub fn compose_service(
    config: &GridConfig,
    ctx: &NetworkContext,
    descriptor: ServiceDescriptor,
) -> ComposedService {
    let id = &descriptor.identifier;

    let container = ContainerSpec {
        name: format!("selenium-{id}-container"),
        image: descriptor.image,
        cpu: config.cpu_units,
        memory_mib: config.memory_mib,
        essential: true,
        environment: descriptor.environment,
        port_mappings: vec![PortMapping {
            container_port: GRID_PORT,
            host_port: GRID_PORT,
            protocol: Protocol::Tcp,
        }],
        log_stream_prefix: format!("selenium-{id}-logs"),
        entry_point: descriptor.entry_point,
        command: descriptor.command,
    };

    let task_definition = TaskDefinitionSpec {
        family: format!("selenium-{id}-task-def"),
        container,
    };

    let service = ServiceSpec {
        name: format!("selenium-{id}-service"),
        cluster: ctx.cluster.name.clone(),
        task_definition: task_definition.family.clone(),
        deployment: DeploymentPolicy {
            min_healthy_percent: MIN_HEALTHY_PERCENT,
            max_healthy_percent: MAX_HEALTHY_PERCENT,
        },
        security_groups: vec![ctx.security_group.name.clone()],
    };

    let handle = ProvisionedService {
        service_name: service.name.clone(),
        container_name: task_definition.container.name.clone(),
        cluster_name: ctx.cluster.name.clone(),
        task_family: task_definition.family.clone(),
    };

    debug!(service = %handle.service_name, "service composed");

    ComposedService {
        task_definition,
        service,
        handle,
    }
}
