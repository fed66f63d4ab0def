use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use the library instead of redeclaring modules
use contest_hub::{
    aggregator::scheduler::RefreshScheduler, config::Config, services::RefreshService,
    store::ContestStore, web::WebServer,
};

#[derive(Parser)]
#[command(name = "contest-hub")]
#[command(version = "0.1.0")]
#[command(about = "Aggregates programming contests and pairs them with solution videos")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("contest_hub={},tower_http=trace", cli.log_level)
    } else {
        format!("contest_hub={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Contest Hub v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            config.refresh.request_timeout_seconds,
        ))
        .user_agent(concat!("contest-hub/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let store = ContestStore::new();
    let refresher = RefreshService::new(&config, client, store.clone());

    // Start the background refresh loop
    let scheduler = RefreshScheduler::new(refresher.clone(), &config.refresh)?;
    tokio::spawn(scheduler.start());
    info!("Refresh scheduler started (cron: {})", config.refresh.cron);

    let web_server = WebServer::new(&config, store, refresher)?;
    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
