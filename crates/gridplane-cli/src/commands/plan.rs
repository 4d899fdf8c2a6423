//! `gridplane plan` — assemble the topology and emit the graph.

use tracing::info;

use gridplane_topology::{assemble_with_discovery, AddressDiscovery};

use super::load_options;

pub fn plan(
    config_path: Option<&str>,
    output: Option<&str>,
    native_discovery: bool,
) -> anyhow::Result<()> {
    let config = load_options(config_path)?.resolve()?;

    let discovery = if native_discovery {
        AddressDiscovery::PlatformNative
    } else {
        AddressDiscovery::default()
    };

    let topology = assemble_with_discovery(&config, discovery)?;
    let json = serde_json::to_string_pretty(&topology)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path, "desired-state graph written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_from_file_writes_graph() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("grid.toml");
        let output_path = dir.path().join("topology.json");
        std::fs::write(
            &config_path,
            "node_max_instances = 500\nnode_max_sessions = 500\n",
        )
        .unwrap();

        plan(
            config_path.to_str(),
            output_path.to_str(),
            false,
        )
        .unwrap();

        let graph: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap())
                .unwrap();
        assert_eq!(graph["services"].as_array().unwrap().len(), 3);
        assert_eq!(graph["scaling_policies"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(plan(Some("/nonexistent/grid.toml"), None, false).is_err());
    }
}
