use axum::{Router, routing::get};
use loan_checker::{
    api::{ApiDoc, api_routes},
    config::CONFIG,
    core::services::LoanService,
    infrastructure::storage::sqlite::SqliteStorage,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&CONFIG.log_level)))
        .init();
    info!("Starting with {:?}", *CONFIG);

    // Initialize storage and the loan catalog
    let storage = SqliteStorage::open(&CONFIG.database_path)?;
    let mut service = LoanService::new(storage, &CONFIG.jwt_secret, CONFIG.bcrypt_cost);
    match service.ensure_catalog_loaded(&CONFIG.catalog_path) {
        Ok(0) => info!("Loan catalog already loaded"),
        Ok(count) => info!("Loaded {} loan offers from {}", count, CONFIG.catalog_path.display()),
        Err(e) => warn!("Loan catalog unavailable, offer search will return nothing: {}", e),
    }
    let service = Arc::new(Mutex::new(service));

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
