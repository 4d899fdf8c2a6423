//! Topology assembler: builds the complete grid desired-state graph.
//!
//! Strictly top-down and synchronous: network context first, then the
//! hub (with its load-balancer listener), then one node service per
//! registered browser flavor, with a scaling policy bound immediately
//! after each service. Node environments are built from the hub's
//! discoverable address, so the hub must exist first.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use gridplane_autoscale::{
    bind_scaling_policy, ScalingPolicy, ScalingPolicyDescriptor,
};
use gridplane_core::{
    BrowserFlavor, GridConfig, GridOptions, GRID_PORT, NODE_REGISTRATION_PORT,
};

use crate::composer::{compose_service, ServiceDescriptor};
use crate::error::{TopologyError, TopologyResult};
use crate::network::provision_network;
use crate::resources::{
    ClusterSpec, Listener, ListenerProtocol, LoadBalancerSpec, NetworkSpec,
    Protocol, ProvisionedService, SecurityGroupSpec, ServiceSpec,
    TargetRegistration, TaskDefinitionSpec,
};

/// Named output under which the grid's public address is exported.
pub const HUB_ADDRESS_OUTPUT: &str = "grid-hub-address";

/// Hub-side timeout for an idle browser session, in milliseconds.
const HUB_BROWSER_TIMEOUT_MS: &str = "200000";

/// Hub-side timeout for a client command, in seconds.
const HUB_COMMAND_TIMEOUT_SECS: &str = "180";

/// Shared-memory size (MiB) required by the browser engines.
const NODE_SHM_SIZE_MIB: &str = "512";

/// How a node discovers the private address it advertises back to the
/// hub.
///
/// Hub and node run in separate network namespaces, so the
/// hub-supplied address must be corrected to the node's own reachable
/// address at boot. The default scrapes the platform's local metadata
/// endpoint through a startup shim; platforms with native service
/// discovery can skip the shim entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressDiscovery {
    /// Scrape the local platform metadata endpoint before launching
    /// the node process.
    MetadataEndpoint { url: String },
    /// No entry-point override; the platform's own service discovery
    /// wires the advertised address.
    PlatformNative,
}

impl Default for AddressDiscovery {
    fn default() -> Self {
        AddressDiscovery::MetadataEndpoint {
            url: "http://169.254.170.2/v2/metadata".to_string(),
        }
    }
}

impl AddressDiscovery {
    /// The entry-point/command override the strategy injects into the
    /// node container, if any.
    fn container_override(&self) -> Option<(Vec<String>, Vec<String>)> {
        match self {
            AddressDiscovery::MetadataEndpoint { url } => {
                let shim = format!(
                    "PRIVATE=$(curl -s {url} | jq -r '.Containers[1].Networks[0].IPv4Addresses[0]') ; \
                     export REMOTE_HOST=\"http://$PRIVATE:{NODE_REGISTRATION_PORT}\" ; \
                     /opt/bin/entry_point.sh"
                );
                Some((
                    vec!["sh".to_string(), "-c".to_string()],
                    vec![shim],
                ))
            }
            AddressDiscovery::PlatformNative => None,
        }
    }
}

/// A node service paired with its browser flavor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeService {
    pub flavor: BrowserFlavor,
    pub service: ProvisionedService,
}

/// The complete desired-state graph for one grid deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridTopology {
    pub network: NetworkSpec,
    pub cluster: ClusterSpec,
    pub security_group: SecurityGroupSpec,
    pub load_balancer: LoadBalancerSpec,
    pub task_definitions: Vec<TaskDefinitionSpec>,
    pub services: Vec<ServiceSpec>,
    pub hub: ProvisionedService,
    pub nodes: Vec<NodeService>,
    pub scaling_policies: Vec<ScalingPolicy>,
    /// Named exports for downstream consumers.
    pub outputs: BTreeMap<String, String>,
}

/// Deployment entry point: resolve sparse options, then assemble.
///
/// Resolution fails fast, before any resource is described.
pub fn plan(options: GridOptions) -> TopologyResult<GridTopology> {
    let config = options.resolve()?;
    assemble(&config)
}

/// Assemble the grid with the default address-discovery strategy.
pub fn assemble(config: &GridConfig) -> TopologyResult<GridTopology> {
    assemble_with_discovery(config, AddressDiscovery::default())
}

/// Assemble the grid: network, hub (with listener), one node per
/// registered flavor, and a scaling policy per service.
pub fn assemble_with_discovery(
    config: &GridConfig,
    discovery: AddressDiscovery,
) -> TopologyResult<GridTopology> {
    let mut ctx = provision_network(config);
    let mut task_definitions = Vec::new();
    let mut services = Vec::new();
    let mut scaling_policies = Vec::new();
    let mut seen = BTreeSet::new();

    // Hub service and its public entry point.
    let hub = {
        let composed = compose_service(
            config,
            &ctx,
            ServiceDescriptor {
                identifier: "hub".to_string(),
                image: format!("selenium/hub:{}", config.selenium_version),
                environment: hub_environment(),
                entry_point: None,
                command: None,
            },
        );
        seen.insert("hub".to_string());

        scaling_policies.push(bind_scaling_policy(&ScalingPolicyDescriptor {
            identifier: "hub".to_string(),
            cluster_name: composed.handle.cluster_name.clone(),
            service_name: composed.handle.service_name.clone(),
        }));

        // Default target routing for 4444 so automation clients can
        // reach the hub. The hub is the balancer's sole target.
        ctx.load_balancer.listeners.push(Listener {
            port: GRID_PORT,
            protocol: ListenerProtocol::Http,
            targets: vec![TargetRegistration {
                service: composed.handle.service_name.clone(),
                container: composed.handle.container_name.clone(),
                port: GRID_PORT,
                protocol: Protocol::Tcp,
            }],
        });

        task_definitions.push(composed.task_definition);
        services.push(composed.service);
        composed.handle
    };

    let hub_address = ctx.load_balancer.dns_name();

    // One node service per registered browser flavor, each pointing
    // back at the hub.
    let mut nodes = Vec::new();
    for flavor in &config.browsers {
        let identifier = flavor.identifier().to_string();
        if !seen.insert(identifier.clone()) {
            return Err(TopologyError::DuplicateService(identifier));
        }

        let (entry_point, command) = match discovery.container_override() {
            Some((ep, cmd)) => (Some(ep), Some(cmd)),
            None => (None, None),
        };

        let composed = compose_service(
            config,
            &ctx,
            ServiceDescriptor {
                identifier: identifier.clone(),
                image: format!("{}:{}", flavor.node_image(), config.selenium_version),
                environment: node_environment(config, &hub_address),
                entry_point,
                command,
            },
        );

        scaling_policies.push(bind_scaling_policy(&ScalingPolicyDescriptor {
            identifier,
            cluster_name: composed.handle.cluster_name.clone(),
            service_name: composed.handle.service_name.clone(),
        }));

        task_definitions.push(composed.task_definition);
        services.push(composed.service);
        nodes.push(NodeService {
            flavor: *flavor,
            service: composed.handle,
        });
    }

    let mut outputs = BTreeMap::new();
    outputs.insert(HUB_ADDRESS_OUTPUT.to_string(), hub_address);

    info!(
        nodes = nodes.len(),
        policies = scaling_policies.len(),
        "grid topology assembled"
    );

    Ok(GridTopology {
        network: ctx.network,
        cluster: ctx.cluster,
        security_group: ctx.security_group,
        load_balancer: ctx.load_balancer,
        task_definitions,
        services,
        hub,
        nodes,
        scaling_policies,
        outputs,
    })
}

/// Hub container environment: session and command timeouts, debug
/// mode. Never carries node-specific keys.
fn hub_environment() -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert("GRID_BROWSER_TIMEOUT".to_string(), HUB_BROWSER_TIMEOUT_MS.to_string());
    env.insert("GRID_TIMEOUT".to_string(), HUB_COMMAND_TIMEOUT_SECS.to_string());
    env.insert("SE_OPTS".to_string(), "-debug".to_string());
    env
}

/// Node container environment: the hub's discoverable address and
/// ports so the node can register itself at boot, per-node ceilings as
/// strings, debug mode, and the shared-memory size the browser engines
/// need.
fn node_environment(config: &GridConfig, hub_address: &str) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert("HUB_PORT_4444_TCP_ADDR".to_string(), hub_address.to_string());
    env.insert("HUB_PORT_4444_TCP_PORT".to_string(), GRID_PORT.to_string());
    env.insert("NODE_PORT".to_string(), NODE_REGISTRATION_PORT.to_string());
    env.insert(
        "NODE_MAX_INSTANCES".to_string(),
        config.node_max_instances.to_string(),
    );
    env.insert(
        "NODE_MAX_SESSION".to_string(),
        config.node_max_sessions.to_string(),
    );
    env.insert("SE_OPTS".to_string(), "-debug".to_string());
    env.insert("shm_size".to_string(), NODE_SHM_SIZE_MIB.to_string());
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplane_core::GridOptions;

    fn default_topology() -> GridTopology {
        assemble(&GridOptions::default().resolve().unwrap()).unwrap()
    }

    #[test]
    fn one_hub_one_node_per_flavor() {
        let topology = default_topology();
        assert_eq!(topology.nodes.len(), 2);
        assert_eq!(topology.services.len(), 3);
        assert_eq!(topology.task_definitions.len(), 3);
        assert_eq!(topology.hub.service_name, "selenium-hub-service");
    }

    #[test]
    fn exactly_one_listener_targeting_the_hub() {
        let topology = default_topology();
        assert_eq!(topology.load_balancer.listeners.len(), 1);
        let listener = &topology.load_balancer.listeners[0];
        assert_eq!(listener.port, 4444);
        assert_eq!(listener.protocol, ListenerProtocol::Http);
        assert_eq!(listener.targets.len(), 1);
        assert_eq!(listener.targets[0].service, topology.hub.service_name);
    }

    #[test]
    fn nodes_are_never_balancer_targets() {
        let topology = default_topology();
        for node in &topology.nodes {
            for listener in &topology.load_balancer.listeners {
                assert!(listener
                    .targets
                    .iter()
                    .all(|t| t.service != node.service.service_name));
            }
        }
    }

    #[test]
    fn every_service_has_exactly_one_policy() {
        let topology = default_topology();
        assert_eq!(topology.scaling_policies.len(), topology.services.len());
        for service in &topology.services {
            let bound = topology
                .scaling_policies
                .iter()
                .filter(|p| p.target.resource_id.ends_with(&service.name))
                .count();
            assert_eq!(bound, 1, "service {} has {bound} policies", service.name);
        }
    }

    #[test]
    fn node_env_points_back_at_the_hub() {
        let topology = default_topology();
        let node_task = topology
            .task_definitions
            .iter()
            .find(|t| t.family == "selenium-chrome-task-def")
            .unwrap();
        let env = &node_task.container.environment;
        assert_eq!(
            env.get("HUB_PORT_4444_TCP_ADDR").map(String::as_str),
            Some("${selenium-grid-alb.dns}")
        );
        assert_eq!(env.get("HUB_PORT_4444_TCP_PORT").map(String::as_str), Some("4444"));
        assert_eq!(env.get("NODE_PORT").map(String::as_str), Some("5555"));
        assert_eq!(env.get("shm_size").map(String::as_str), Some("512"));
    }

    #[test]
    fn hub_env_carries_no_node_keys() {
        let topology = default_topology();
        let hub_task = topology
            .task_definitions
            .iter()
            .find(|t| t.family == "selenium-hub-task-def")
            .unwrap();
        let env = &hub_task.container.environment;
        assert!(env.keys().all(|k| !k.starts_with("NODE_")));
        assert!(env.keys().all(|k| !k.starts_with("HUB_PORT_")));
        assert_eq!(env.get("GRID_BROWSER_TIMEOUT").map(String::as_str), Some("200000"));
        assert_eq!(env.get("GRID_TIMEOUT").map(String::as_str), Some("180"));
        assert_eq!(env.get("SE_OPTS").map(String::as_str), Some("-debug"));
    }

    #[test]
    fn default_discovery_installs_the_startup_shim() {
        let topology = default_topology();
        let node_task = topology
            .task_definitions
            .iter()
            .find(|t| t.family == "selenium-firefox-task-def")
            .unwrap();
        let container = &node_task.container;
        assert_eq!(
            container.entry_point,
            Some(vec!["sh".to_string(), "-c".to_string()])
        );
        let command = container.command.as_ref().unwrap();
        assert!(command[0].contains("169.254.170.2/v2/metadata"));
        assert!(command[0].contains("REMOTE_HOST=\"http://$PRIVATE:5555\""));
        assert!(command[0].ends_with("/opt/bin/entry_point.sh"));
    }

    #[test]
    fn platform_native_discovery_skips_the_shim() {
        let config = GridOptions::default().resolve().unwrap();
        let topology =
            assemble_with_discovery(&config, AddressDiscovery::PlatformNative).unwrap();
        for task in &topology.task_definitions {
            assert!(task.container.entry_point.is_none());
            assert!(task.container.command.is_none());
        }
    }

    #[test]
    fn hub_address_is_exported() {
        let topology = default_topology();
        assert_eq!(
            topology.outputs.get(HUB_ADDRESS_OUTPUT).map(String::as_str),
            Some("${selenium-grid-alb.dns}")
        );
    }

    #[test]
    fn plan_rejects_invalid_options_before_building() {
        let options = GridOptions {
            memory: Some(0),
            ..Default::default()
        };
        assert!(matches!(plan(options), Err(TopologyError::Config(_))));
        assert!(plan(GridOptions::default()).is_ok());
    }

    #[test]
    fn duplicate_flavor_fails_without_partial_graph() {
        let mut config = GridOptions::default().resolve().unwrap();
        config.browsers = vec![BrowserFlavor::Chrome, BrowserFlavor::Chrome];
        let err = assemble(&config).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateService(id) if id == "chrome"));
    }
}
