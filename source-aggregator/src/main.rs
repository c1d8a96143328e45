use clap::Parser;
use source_aggregator::{create_router, AppState, CacheConfig, ContentAggregator, FetchConfig, SourcesConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "source-aggregator", about = "Cached aggregation gateway for tech news sources")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// TTL in seconds for sources without their own override
    #[arg(long, env = "CACHE_DEFAULT_TTL", default_value_t = 300)]
    default_ttl: u64,

    /// Seconds between background sweeps of expired entries; 0 disables
    #[arg(long, env = "CACHE_SWEEP_INTERVAL", default_value_t = 60)]
    sweep_interval: u64,

    #[arg(long, env = "UPSTREAM_USER_AGENT", default_value = "Tech-Mastery-Lab/1.0")]
    user_agent: String,

    /// Per-request transport timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT", default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let fetch_config = FetchConfig {
        user_agent: args.user_agent,
        timeout_seconds: args.timeout,
    };
    let cache_config = CacheConfig {
        default_ttl_seconds: args.default_ttl,
        sweep_interval_seconds: args.sweep_interval,
    };
    let sources = SourcesConfig::default();

    let aggregator = ContentAggregator::with_fetcher(fetch_config, &cache_config, &sources)?;
    let _sweeper = aggregator
        .cache()
        .spawn_sweeper(Duration::from_secs(cache_config.sweep_interval_seconds));

    let app = create_router(AppState {
        aggregator: Arc::new(aggregator),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("Source aggregator listening on port {}", args.port);
    info!("API endpoints available at http://localhost:{}/api", args.port);

    axum::serve(listener, app).await?;
    Ok(())
}
