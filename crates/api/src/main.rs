use std::net::SocketAddr;
use std::sync::Arc;

use blogcraft_integrations::airtable::{AirtableApi, AirtableConfig};
use blogcraft_integrations::gemini::{GeminiApi, GeminiConfig};
use blogcraft_integrations::languagetool::LanguageToolApi;
use blogcraft_pipeline::publication::PublicationRouter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogcraft_api::config::ServerConfig;
use blogcraft_api::router::build_app_router;
use blogcraft_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blogcraft_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = blogcraft_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    blogcraft_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    blogcraft_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Hosted services ---
    let gemini = GeminiConfig::from_env();
    tracing::info!(model = %gemini.model, "Text generator configured");
    let generator = Arc::new(GeminiApi::new(gemini));
    let grammar = Arc::new(LanguageToolApi::from_env());
    let records = Arc::new(AirtableApi::new(AirtableConfig::from_env()));

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        generator,
        grammar,
        publisher: Arc::new(PublicationRouter::new(pool, records)),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
