//! `gridplane config` — show the resolved configuration.

use anyhow::bail;

use super::load_options;

pub fn show(config_path: Option<&str>, format: &str) -> anyhow::Result<()> {
    let config = load_options(config_path)?.resolve()?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        "text" => {
            println!("selenium version:   {}", config.selenium_version);
            println!("memory (MiB):       {}", config.memory_mib);
            println!("cpu (units):        {}", config.cpu_units);
            println!("node max instances: {}", config.node_max_instances);
            println!("node max sessions:  {}", config.node_max_sessions);
            println!(
                "browsers:           {}",
                config
                    .browsers
                    .iter()
                    .map(|b| b.identifier())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        other => bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
