use clap::Parser;
use tracing_subscriber::EnvFilter;

use affiliate_api::{app, config::AppConfig, AppState};

#[derive(Parser)]
#[command(name = "affiliate-api")]
#[command(about = "Affiliate AI Pro backend API server")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Interface to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, SUPABASE_URL, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("affiliate_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config: AppConfig = affiliate_api::config::config().clone();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::info!("Starting Affiliate API in {:?} mode", config.environment);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Affiliate API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
