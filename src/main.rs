use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use tokio::runtime::Builder;
use tokio::sync::RwLock;

use congestion_routing::control_server::ControlServer;
use congestion_routing::{route, NetworkConfig, RouteError, RoutingMode};

#[derive(Parser)]
#[command(name = "congestion-routing", about = "Static and dynamic shortest path routing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a network config and print its adjacency matrix
    Check {
        #[arg(long)]
        config: PathBuf,
    },
    /// Compute one shortest path
    Route {
        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        source: String,

        #[arg(long)]
        destination: String,

        #[arg(long, value_enum, default_value_t = RoutingMode::Static)]
        mode: RoutingMode,

        /// Congestion flags overriding the config, e.g. 0,1,0,0
        #[arg(long, value_delimiter = ',')]
        congestion: Option<Vec<u8>>,
    },
    /// Serve route queries over the JSON control channel
    Serve {
        #[arg(long)]
        config: PathBuf,

        #[arg(long, default_value_t = 7878)]
        port: u16,
    },
}

fn load(path: &Path) -> Result<congestion_routing::NetworkModel> {
    NetworkConfig::load(path)
        .and_then(NetworkConfig::into_model)
        .with_context(|| format!("loading {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { config } => {
            let model = load(&config)?;
            println!("Adjacency Matrix:\n{}", model.render_adjacency());
            for (index, address) in model.addresses().iter().enumerate() {
                let state = if model.is_congested(index) { "congested" } else { "clear" };
                println!("Router {} {} ({})", index + 1, address, state);
            }
        }
        Command::Route {
            config,
            source,
            destination,
            mode,
            congestion,
        } => {
            let mut model = load(&config)?;
            if let Some(flags) = congestion {
                model.set_congestion(&flags)?;
            }
            match route(&model, &source, &destination, mode) {
                Ok(result) => println!("{}", result),
                // Congested endpoints are a normal outcome, not a failure.
                Err(e @ RouteError::CongestedEndpoint { .. }) => println!("{}", e),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Serve { config, port } => {
            let model = load(&config)?;
            let rt = Builder::new_multi_thread().enable_all().build()?;

            rt.block_on(async {
                let server = ControlServer::new(port, Arc::new(RwLock::new(model)));
                info!("Serving routes from {}", config.display());
                server.start().await
            })?;
        }
    }

    Ok(())
}
