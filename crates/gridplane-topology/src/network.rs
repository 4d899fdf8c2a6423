//! Network provisioner: shared boundary, security rules, and the
//! public load balancer.

use tracing::info;

use gridplane_core::{GridConfig, GRID_PORT, NODE_REGISTRATION_PORT};

use crate::resources::{
    CapacityProvider, CapacityProviderEntry, ClusterSpec, IngressRule,
    LoadBalancerSpec, NetworkSpec, PeerSource, Protocol, SecurityGroupSpec,
};

/// Guaranteed-capacity units satisfied before the weighted split
/// applies.
pub const CAPACITY_BASE: u32 = 4;

/// The shared network context for a grid deployment.
///
/// Created once, before any service; shared by reference by every
/// service built afterwards. The only mutation permitted after
/// creation is appending listeners to the load balancer.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkContext {
    pub network: NetworkSpec,
    pub cluster: ClusterSpec,
    pub security_group: SecurityGroupSpec,
    pub load_balancer: LoadBalancerSpec,
}

/// Establish the network boundary, cluster capacity strategy,
/// security rules, and the internet-facing load balancer.
///
/// The capacity strategy guarantees a baseline of stable capacity
/// (base 4 on standard) and splits remaining demand 1:4 in favor of
/// cost-efficient spot capacity. Ingress admits the coordination port
/// and the node-registration port from any source; egress is
/// unrestricted.
pub fn provision_network(config: &GridConfig) -> NetworkContext {
    let network = NetworkSpec {
        name: "selenium-grid-net".to_string(),
        source: config.network.clone(),
    };

    let cluster = ClusterSpec {
        name: "grid-cluster".to_string(),
        capacity_strategy: vec![
            CapacityProviderEntry {
                provider: CapacityProvider::Standard,
                weight: 1,
                base: CAPACITY_BASE,
            },
            CapacityProviderEntry {
                provider: CapacityProvider::Spot,
                weight: 4,
                base: 0,
            },
        ],
    };

    let security_group = SecurityGroupSpec {
        name: "security-group-selenium".to_string(),
        allow_all_outbound: true,
        ingress: vec![
            IngressRule {
                port: GRID_PORT,
                protocol: Protocol::Tcp,
                source: PeerSource::AnyIpv4,
                description: format!("Port {GRID_PORT} for inbound traffic"),
            },
            IngressRule {
                port: NODE_REGISTRATION_PORT,
                protocol: Protocol::Tcp,
                source: PeerSource::AnyIpv4,
                description: format!("Port {NODE_REGISTRATION_PORT} for inbound traffic"),
            },
        ],
    };

    let load_balancer = LoadBalancerSpec {
        name: "selenium-grid-alb".to_string(),
        internet_facing: true,
        security_groups: vec![security_group.name.clone()],
        listeners: vec![],
    };

    info!(
        cluster = %cluster.name,
        load_balancer = %load_balancer.name,
        "network context provisioned"
    );

    NetworkContext {
        network,
        cluster,
        security_group,
        load_balancer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplane_core::GridOptions;

    fn context() -> NetworkContext {
        provision_network(&GridOptions::default().resolve().unwrap())
    }

    #[test]
    fn capacity_strategy_prefers_spot_with_standard_base() {
        let ctx = context();
        assert_eq!(
            ctx.cluster.capacity_strategy,
            vec![
                CapacityProviderEntry {
                    provider: CapacityProvider::Standard,
                    weight: 1,
                    base: 4,
                },
                CapacityProviderEntry {
                    provider: CapacityProvider::Spot,
                    weight: 4,
                    base: 0,
                },
            ]
        );
    }

    #[test]
    fn ingress_opens_both_grid_ports() {
        let ctx = context();
        let ports: Vec<u16> =
            ctx.security_group.ingress.iter().map(|r| r.port).collect();
        assert_eq!(ports, vec![4444, 5555]);
        assert!(ctx.security_group.allow_all_outbound);
        assert!(ctx
            .security_group
            .ingress
            .iter()
            .all(|r| r.source == PeerSource::AnyIpv4));
    }

    #[test]
    fn balancer_is_public_and_guarded() {
        let ctx = context();
        assert!(ctx.load_balancer.internet_facing);
        assert_eq!(
            ctx.load_balancer.security_groups,
            vec![ctx.security_group.name.clone()]
        );
        assert!(ctx.load_balancer.listeners.is_empty());
    }
}
