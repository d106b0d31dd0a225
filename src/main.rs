use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use barabula_api::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{
        providers::{GooglePlacesProvider, OpenWeatherProvider},
        PlacesProvider, StaticTokenAuthenticator, WeatherProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("barabula_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let places_provider: Arc<dyn PlacesProvider> = Arc::new(
        GooglePlacesProvider::new(
            cache.clone(),
            config.google_maps_api_key.clone(),
            config.google_places_url.clone(),
            config.provider_timeout(),
        )
        .context("Failed to build places provider")?,
    );
    let weather_provider: Arc<dyn WeatherProvider> = Arc::new(
        OpenWeatherProvider::new(
            cache,
            config.openweather_api_key.clone(),
            config.openweather_url.clone(),
            config.provider_timeout(),
        )
        .context("Failed to build weather provider")?,
    );

    let authenticator = StaticTokenAuthenticator::from_entries(&config.api_tokens)
        .context("Invalid API_TOKENS")?;
    if authenticator.is_empty() {
        tracing::warn!("No API tokens configured; every authenticated route will answer 401");
    }

    tracing::info!(
        places = places_provider.name(),
        weather = weather_provider.name(),
        tokens = authenticator.len(),
        "Providers configured"
    );

    let state = AppState::new(
        places_provider,
        weather_provider,
        Arc::new(authenticator),
        config.recommendation_settings(),
    );

    let app = create_router(state).layer(cors_layer(&config.allowed_origins));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
