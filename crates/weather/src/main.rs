use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use weather::{DEFAULT_PATH, DEFAULT_UPSTREAM, WeatherClient};

#[derive(Parser)]
#[command(name = "weather-server")]
#[command(about = "MCP tool server exposing get_weather", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Mount path of the MCP endpoint
    #[arg(long, default_value = DEFAULT_PATH)]
    path: String,

    /// Base URL of the upstream weather service
    #[arg(long, default_value = DEFAULT_UPSTREAM)]
    upstream: String,

    /// Upstream lookup timeout in seconds
    #[arg(long, default_value_t = 6)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> weather::Result<()> {
    let cli = Cli::parse();

    let client = WeatherClient::builder()
        .upstream(cli.upstream)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;

    let router = weather::router(client, &cli.path)?;
    let listener = TcpListener::bind(cli.bind).await?;
    println!("weather server on http://{}{}", cli.bind, cli.path);

    weather::serve(listener, router, until_signal(tokio::signal::ctrl_c())).await
}

/// Resolve when `signal` fires. If the handler cannot be installed, never
/// resolve, so the server keeps running instead of shutting down at once.
async fn until_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        warn!(error = %e, "cannot listen for ctrl-c; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}
