// ABOUTME: Canopy server entry point
// ABOUTME: Loads config, opens the database, and serves the API with CORS

use std::net::SocketAddr;
use std::path::Path;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use canopy_ai::AiService;
use canopy_api::{create_router, AppState};
use canopy_auth::JwtAuth;
use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    info!("Starting Canopy server on port {}", config.port);

    let pool = canopy_storage::connect(Path::new(&config.database_path)).await?;

    let jwt = JwtAuth::new(config.jwt_secret.as_bytes());
    let ai = AiService::new(config.gemini_api_key.clone());
    let state = AppState::new(pool, jwt, ai);

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
