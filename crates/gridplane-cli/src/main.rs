use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gridplane",
    about = "gridplane — browser-automation grid topology assembler",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the configuration, assemble the grid topology, and emit
    /// the desired-state graph as JSON.
    Plan {
        /// Path to a grid.toml file. Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<String>,
        /// Write the graph to a file instead of stdout.
        #[arg(short, long)]
        output: Option<String>,
        /// Rely on the platform's native service discovery instead of
        /// the metadata-endpoint startup shim in node containers.
        #[arg(long)]
        native_discovery: bool,
    },
    /// Show the resolved grid configuration.
    Config {
        /// Path to a grid.toml file. Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gridplane=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            config,
            output,
            native_discovery,
        } => commands::plan::plan(config.as_deref(), output.as_deref(), native_discovery),
        Commands::Config { config, format } => {
            commands::config::show(config.as_deref(), &format)
        }
    }
}
