use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::Parser;
use foodlens_api::{
    application::http::server::http_server::{router, state},
    args::{Args, LogArgs},
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// How often idle rate-limit buckets are dropped
const RATE_LIMIT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

fn init_logger(log: &LogArgs) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_new(&log.filter)?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if log.json {
        subscriber.json().try_init().map_err(|e| anyhow::anyhow!(e))?;
    } else {
        subscriber.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    let args = Arc::new(Args::parse());
    init_logger(&args.log)?;

    if args.llm.gemini_api_key.is_empty() {
        anyhow::bail!("GEMINI_API_KEY must be set");
    }

    let app_state = state(args.clone())?;

    let rate_limiter = app_state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            rate_limiter.retain_recent();
            rate_limiter.shrink_to_fit();
        }
    });

    let router = router(app_state)?;

    let addr = format!("{}:{}", args.server.host, args.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
