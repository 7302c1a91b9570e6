use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agendizo_api::background;
use agendizo_api::config::ServerConfig;
use agendizo_api::notifications::{build_notifier, NotificationRouter};
use agendizo_api::router::build_app_router;
use agendizo_api::state::AppState;
use agendizo_billing::StripeApi;
use agendizo_events::EventBus;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agendizo_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = agendizo_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    agendizo_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    agendizo_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Integrations ---
    let notifier = build_notifier(&config).expect("Failed to build email client");
    let stripe = config.stripe.as_ref().map(|cfg| Arc::new(StripeApi::new(cfg)));
    if stripe.is_none() {
        tracing::warn!("STRIPE_SECRET_KEY not set, billing is disabled");
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // Spawn notification router (turns booking events into emails).
    let router_handle = notifier.clone().map(|notifier| {
        let router = NotificationRouter::new(pool.clone(), notifier);
        tokio::spawn(router.run(event_bus.subscribe()))
    });

    // --- Background jobs ---
    let jobs_cancel = CancellationToken::new();
    let mut job_handles = vec![
        tokio::spawn(background::auto_complete::run(pool.clone(), jobs_cancel.clone())),
        tokio::spawn(background::session_cleanup::run(pool.clone(), jobs_cancel.clone())),
    ];
    if let Some(notifier) = notifier.clone() {
        job_handles.push(tokio::spawn(background::reminders::run(
            pool.clone(),
            notifier,
            jobs_cancel.clone(),
        )));
    }
    tracing::info!(jobs = job_handles.len(), "Background jobs started");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        notifier,
        stripe,
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    jobs_cancel.cancel();
    for handle in job_handles {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Background jobs stopped");

    // Dropping the last sender closes the channel and ends the router loop.
    drop(event_bus);
    if let Some(handle) = router_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Notification router shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
