use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use geosme::config::{init_db, run_migrations, Config};
use geosme::modules::auth::crud::SessionCrud;
use geosme::services::jwt::JwtService;
use geosme::services::rate_limit::{self, ClientRateLimiter};
use geosme::AppState;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geosme=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(environment = ?config.environment, "Configuration loaded");

    let db = init_db(&config.database_url).await?;
    run_migrations(&db).await?;
    tracing::info!("Connected to Postgres, migrations applied");

    let jwt_service = JwtService::new(config.jwt_secret.clone());
    let state = Arc::new(
        AppState::new(db.clone(), jwt_service)
            .await?
            .with_trust_proxy(config.trust_proxy),
    );
    if config.trust_proxy {
        tracing::info!("Client addresses taken from forwarded headers");
    }

    tokio::spawn(sweep_expired_sessions(SessionCrud::new(db.clone())));
    tokio::spawn(prune_rate_limiter(state.rate_limiter.clone()));

    let app = geosme::create_app(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn sweep_expired_sessions(sessions: SessionCrud) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        match sessions.delete_expired().await {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "Expired sessions removed"),
            Err(e) => tracing::error!(error = %e, "Session sweep failed"),
        }
    }
}

async fn prune_rate_limiter(limiter: ClientRateLimiter) {
    let mut interval = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
    loop {
        interval.tick().await;
        let tracked = rate_limit::prune(&limiter);
        tracing::debug!(tracked, "Rate limiter pruned");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
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
