use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod config;
mod response;
mod routes;
mod upstream;

use cache::{MokaResponseCache, ResponseCache};
use config::Config;
use response::ResponseBuilder;
use routes::{create_router, AppState};
use upstream::{geo::GeoClient, weather::WeatherClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_edge_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let responses = ResponseBuilder::new(&config.allowed_origin, config.cache_ttl_secs)?;
    let cache: Arc<dyn ResponseCache> = Arc::new(MokaResponseCache::new(config.cache_max_capacity));
    let geo_client = Arc::new(GeoClient::new(config.clone()));
    let weather_client = Arc::new(WeatherClient::new(config.clone()));
    let store_tasks = TaskTracker::new();

    let bind_addr = config.bind_addr.clone();

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        geo_client,
        weather_client,
        cache,
        responses,
        store_tasks: store_tasks.clone(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server starting on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cache writes outlive their responses; drain them before exit.
    store_tasks.close();
    store_tasks.wait().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
