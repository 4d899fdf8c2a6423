//! End-to-end assembly scenarios.

use gridplane_autoscale::Statistic;
use gridplane_core::{BrowserFlavor, GridOptions};
use gridplane_topology::{assemble, ListenerProtocol};

#[test]
fn high_capacity_grid_end_to_end() {
    let config = GridOptions {
        node_max_instances: Some(500),
        node_max_sessions: Some(500),
        cpu: Some(256),
        memory: Some(512),
        ..Default::default()
    }
    .resolve()
    .unwrap();

    let topology = assemble(&config).unwrap();

    // One hub, two nodes (chrome, firefox), all sized from config.
    assert_eq!(topology.nodes.len(), 2);
    assert_eq!(
        topology.nodes.iter().map(|n| n.flavor).collect::<Vec<_>>(),
        vec![BrowserFlavor::Chrome, BrowserFlavor::Firefox]
    );
    for task in &topology.task_definitions {
        assert_eq!(task.container.cpu, 256);
        assert_eq!(task.container.memory_mib, 512);
    }

    // Node ceilings injected as strings.
    for node in &topology.nodes {
        let task = topology
            .task_definitions
            .iter()
            .find(|t| t.family == node.service.task_family)
            .unwrap();
        let env = &task.container.environment;
        assert_eq!(env.get("NODE_MAX_INSTANCES").map(String::as_str), Some("500"));
        assert_eq!(env.get("NODE_MAX_SESSION").map(String::as_str), Some("500"));
    }

    // Three independent policies with identical 30/70 thresholds.
    assert_eq!(topology.scaling_policies.len(), 3);
    for policy in &topology.scaling_policies {
        assert_eq!(policy.policy.evaluate(25.0), -1);
        assert_eq!(policy.policy.evaluate(50.0), 0);
        assert_eq!(policy.policy.evaluate(80.0), 1);
        assert_eq!(policy.policy.cooldown_secs, 180);
        assert_eq!(policy.metric.statistic, Statistic::Maximum);
        assert_eq!(policy.target.min_capacity, 1);
        assert_eq!(policy.target.max_capacity, 10);
    }

    // Public entry point: one HTTP listener at 4444, hub only.
    assert_eq!(topology.load_balancer.listeners.len(), 1);
    assert_eq!(topology.load_balancer.listeners[0].port, 4444);
    assert_eq!(
        topology.load_balancer.listeners[0].protocol,
        ListenerProtocol::Http
    );
}

#[test]
fn topology_serializes_deterministically() {
    let config = GridOptions::default().resolve().unwrap();
    let a = serde_json::to_string(&assemble(&config).unwrap()).unwrap();
    let b = serde_json::to_string(&assemble(&config).unwrap()).unwrap();
    assert_eq!(a, b);

    let value: serde_json::Value = serde_json::from_str(&a).unwrap();
    assert_eq!(value["outputs"]["grid-hub-address"], "${selenium-grid-alb.dns}");
    assert_eq!(value["services"].as_array().unwrap().len(), 3);
}
