use clap::Parser;
use storage_box_exporter::{config::Config, lifecycle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional configuration file (environment variables take precedence)
    #[arg(short, long)]
    config: Option<String>,

    /// Address to serve metrics and health checks on (overrides config)
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Storage Box Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(addr) = args.listen_addr {
        config.server.listen_addr = addr;
    }

    info!("Configuration loaded successfully");
    info!("Hetzner API endpoint: {}", config.hcloud.endpoint);
    info!(
        "Metrics endpoint: http://{}/metrics",
        config.server.listen_addr
    );

    lifecycle::run(config).await
}
