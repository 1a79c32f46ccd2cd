use std::sync::Arc;

use blogcraft_integrations::airtable::{AirtableApi, AirtableConfig};
use blogcraft_integrations::gemini::{GeminiApi, GeminiConfig};
use blogcraft_integrations::wordpress::{WordPressApi, WordPressConfig};
use blogcraft_pipeline::publisher::PeriodicPublisher;
use blogcraft_pipeline::scheduled::ScheduledPostProcessor;
use blogcraft_worker::WorkerConfig;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blogcraft_worker=debug,blogcraft_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(
        publish_interval_secs = config.publish_interval.as_secs(),
        scheduled_interval_secs = config.scheduled_interval.as_secs(),
        platform_publisher = config.platform_publisher_enabled,
        "Worker starting"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = blogcraft_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    blogcraft_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    blogcraft_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Jobs ---
    let cancel = CancellationToken::new();
    let mut jobs = JoinSet::new();

    let generator = Arc::new(GeminiApi::new(GeminiConfig::from_env()));
    let processor = ScheduledPostProcessor::new(pool, generator);
    {
        let cancel = cancel.clone();
        let period = config.scheduled_interval;
        jobs.spawn(async move { processor.run(period, cancel).await });
    }

    if config.platform_publisher_enabled {
        let records = Arc::new(AirtableApi::new(AirtableConfig::from_env()));
        let platform = Arc::new(WordPressApi::new(WordPressConfig::from_env()));
        let publisher = PeriodicPublisher::new(records, platform);
        let cancel = cancel.clone();
        let period = config.publish_interval;
        jobs.spawn(async move { publisher.run(period, cancel).await });
    }

    shutdown_signal().await;
    cancel.cancel();

    while let Some(result) = jobs.join_next().await {
        if let Err(e) = result {
            tracing::error!(error = %e, "Background job panicked");
        }
    }

    tracing::info!("Worker stopped");
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
        () = ctrl_c => tracing::info!("Received SIGINT, stopping jobs"),
        () = terminate => tracing::info!("Received SIGTERM, stopping jobs"),
    }
}
