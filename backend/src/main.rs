//! Bakery Management Platform - Backend Server
//!
//! Tracks ingredient stock in gram-equivalents, records supplier purchases,
//! and deducts recipe ingredients as customer orders are placed.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bakery_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Bakery Management Server");
    tracing::info!("Environment: {}", config.environment);

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db: db_pool,
        config: Arc::new(config),
    };

    let app = create_app(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Bakery Management Platform API v1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use crate::config::{DatabaseConfig, ImportConfig, ServerConfig};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = Config {
            environment: "test".to_string(),
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                acquire_timeout_secs: 1,
            },
            import: ImportConfig::default(),
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        create_app(AppState {
            db,
            config: Arc::new(config),
        })
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bulk_import_requires_purchase_date() {
        let (status, json) = post_json(
            "/api/v1/ingredients/bulk",
            r#"{"items":[{"name":"Flour","category":"Dry","unit":"kg","price":100,"quantity":2}]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["field"], "purchase_date");
    }

    #[tokio::test]
    async fn test_bulk_import_rejects_non_array_items_as_json() {
        let (status, json) = post_json(
            "/api/v1/ingredients/bulk",
            r#"{"items":"flour","purchase_date":"2025-01-01"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["field"], "body");
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_bulk_import_rejects_malformed_purchase_date() {
        let (status, json) = post_json(
            "/api/v1/ingredients/bulk",
            r#"{"items":[{"name":"Flour"}],"purchase_date":"01/02/2025"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["details"].as_str().unwrap().contains("purchase_date"));
    }

    #[tokio::test]
    async fn test_order_rejects_fractional_quantity() {
        let (status, json) = post_json(
            "/api/v1/orders",
            r#"{"customer_id":"CUS-2025-001","orderItems":[{"name":"Croissant","quantity":1.5,"price":"2.50"}]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["field"], "body");
    }

    #[tokio::test]
    async fn test_order_requires_items() {
        let (status, json) = post_json(
            "/api/v1/orders",
            r#"{"customer_id":"CUS-2025-001","orderItems":[]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["field"], "orderItems");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nowhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
