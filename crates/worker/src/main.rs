//! `turn-notify-worker` -- turn change push notifier.
//!
//! Consumes the `game_update_tasks` queue filled by the `games` update
//! trigger and notifies the player whose turn it now is via FCM.
//! See [`turn_notify_worker::config::WorkerConfig::from_env`] for the
//! environment variables.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use turn_notify_db::PgUserDirectory;
use turn_notify_events::{FcmChannel, TurnNotifier};
use turn_notify_worker::config::WorkerConfig;
use turn_notify_worker::poller::TaskPoller;
use turn_notify_worker::telemetry::{self, LogFormat};

/// How long to wait for the in-flight task after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init(LogFormat::from_env());

    // --- Configuration ---
    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });
    tracing::info!(
        max_connections = config.max_connections,
        fcm_endpoint = %config.fcm.endpoint,
        "Loaded worker configuration",
    );

    // --- Database ---
    let pool = turn_notify_db::create_pool(&config.database_url, config.max_connections)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        });
    tracing::info!("Database connection pool created");

    if let Err(e) = turn_notify_db::health_check(&pool).await {
        tracing::error!(error = %e, "Database health check failed");
        std::process::exit(1);
    }
    tracing::info!("Database health check passed");

    if let Err(e) = turn_notify_db::run_migrations(&pool).await {
        tracing::error!(error = %e, "Failed to run database migrations");
        std::process::exit(1);
    }
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let channel = FcmChannel::new(config.fcm.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build FCM client");
        std::process::exit(1);
    });
    let directory = PgUserDirectory::new(pool.clone());
    let notifier = TurnNotifier::new(Arc::new(directory), Arc::new(channel));

    // --- Task poller ---
    let cancel = CancellationToken::new();
    let poller = TaskPoller::new(pool, notifier, config.poll_interval, config.stale_after);
    let poller_cancel = cancel.clone();
    let poller_handle = tokio::spawn(async move {
        poller.run(poller_cancel).await;
    });

    shutdown_signal().await;

    tracing::info!("Shutdown signal received, stopping task poller");
    cancel.cancel();
    if tokio::time::timeout(SHUTDOWN_GRACE, poller_handle).await.is_err() {
        tracing::warn!("Task poller did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
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
}
