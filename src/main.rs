use std::net::SocketAddr;
use std::sync::Arc;

use library_dashboard::config::AppConfig;
use library_dashboard::services::dashboard::DashboardService;
use library_dashboard::services::library_api::LibraryApiClient;
use library_dashboard::AppState;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let api = LibraryApiClient::from_config(&config)?;
    tracing::info!(
        library_api = %config.library_api_url,
        reference_stale_secs = config.reference_stale_secs,
        request_stale_secs = config.request_stale_secs,
        "Library API client ready"
    );

    let dashboard = DashboardService::new(Arc::new(api), config.staleness(), config.locale);
    let state = AppState {
        config: config.clone(),
        dashboard: Arc::new(dashboard),
    };

    let host: std::net::IpAddr = config.host.parse()?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(host = %addr, "Starting library dashboard server");

    let app = library_dashboard::routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
