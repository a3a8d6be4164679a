use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use dealscout::aggregator::Aggregator;
use dealscout::config::AppConfig;
use dealscout::fetch::FetchClient;
use dealscout::presenter;
use dealscout::sites::SiteRegistry;
use dealscout::web::{self, AppState};

#[derive(Parser)]
#[command(name = "dealscout", version, about = "Cross-site product price aggregation service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API listener
    Serve {
        /// Bind address, overrides the configured host
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the built-in example queries and print results as JSON
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dealscout=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    let fetcher = FetchClient::new(config.fetcher.clone())?;
    let registry = Arc::new(SiteRegistry::standard(fetcher)?);
    let aggregator = Arc::new(Aggregator::new(registry, &config.fetcher));

    match cli.command.unwrap_or(Command::Demo) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting dealscout API server...");
            web::serve(&config.server, AppState { aggregator }).await
        }
        Command::Demo => run_demo(aggregator).await,
    }
}

async fn run_demo(aggregator: Arc<Aggregator>) -> Result<()> {
    let examples = [
        ("US", "iPhone 16 Pro, 128GB"),
        ("IN", "boAt Airdopes 311 Pro"),
    ];

    for (country, query) in examples {
        println!("\n{}", "=".repeat(60));
        println!("Results for {query} in {country}:");
        println!("{}", "=".repeat(60));

        let results = aggregator.aggregate(country, query).await?;
        let quotes = presenter::present(results);
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    }

    Ok(())
}
