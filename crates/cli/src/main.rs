use anyhow::Context;
use clap::{Parser, Subcommand};

use catalog_kernel::settings::Settings;

/// Comic catalog command-line entrypoint
#[derive(Debug, Parser)]
#[command(name = "catalog-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the resolved settings as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    match cli.command {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)?;
            println!("{rendered}");
            Ok(())
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }

            catalog_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                host = %settings.server.host,
                port = settings.server.port,
                "catalog-cli serve"
            );

            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(catalog_app::run(settings))
        }
    }
}
