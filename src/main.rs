//! Librarium Server - Library lending backend
//!
//! A Rust REST API server for managing a lending library: users,
//! publishers, a book catalog, lend transactions and statistics.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librarium_server::{
    api,
    config::{AppConfig, DatabaseConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("librarium_server={},tower_http=debug", config.logging.level).into()
    });

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Librarium Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool, waiting for the database to come up
    let pool = connect_with_retries(&config.database).await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connect to the database with a bounded retry budget. Only startup
/// retries; once the pool exists, request-path failures surface as-is.
async fn connect_with_retries(config: &DatabaseConfig) -> anyhow::Result<Pool<Postgres>> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < config.connect_retries => {
                tracing::warn!(attempt, error = %e, "Database not ready, retrying");
                tokio::time::sleep(Duration::from_secs(config.connect_retry_secs)).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Users
        .route("/users/register", post(api::users::register))
        .route("/users/token", post(api::users::login))
        .route("/users", get(api::users::list_users))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id", put(api::users::update_user))
        .route("/users/:id", delete(api::users::delete_user))
        .route("/users/:id/history", get(api::users::get_user_history))
        // Publishers
        .route("/publishers", post(api::publishers::create_publisher))
        .route("/publishers", get(api::publishers::list_publishers))
        .route("/publishers", put(api::publishers::update_publisher))
        .route("/publishers", delete(api::publishers::delete_publisher))
        .route("/publishers/:id", get(api::publishers::get_publisher))
        // Books
        .route("/books", post(api::books::create_book))
        .route("/books", get(api::books::list_books))
        .route("/books/availability", get(api::books::get_availability))
        .route("/books/search/title", get(api::books::search_by_title))
        .route("/books/search/author", get(api::books::search_by_author))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        .route("/books/:id/history", get(api::books::get_book_history))
        // Lends
        .route("/lends", post(api::lends::create_lend))
        .route("/lends/return", post(api::lends::return_book))
        .route("/lends", get(api::lends::list_lends))
        .route("/lends/:id", get(api::lends::get_lend))
        .route("/lends/:id", delete(api::lends::delete_lend))
        // Statistics
        .route("/stats/top-borrowed", get(api::stats::top_borrowed))
        .route("/stats/monthly-borrowed", get(api::stats::monthly_borrowed))
        .route("/stats/yearly-summary/:year", get(api::stats::yearly_summary))
        .route(
            "/stats/category-monthly-average",
            get(api::stats::category_monthly_average),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
