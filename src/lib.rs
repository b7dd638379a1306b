pub mod config;
pub mod modules;
pub mod response;
pub mod services;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::DbPool;
use modules::admin::admin_routes;
use modules::analysis::analysis_routes;
use modules::auth::auth_routes;
use modules::directory::{directory_routes, DirectoryStore};
use modules::imports::import_routes;
use modules::metrics::metrics_routes;
use modules::notifications::NotificationStore;
use modules::settings::SettingsStore;
use services::jwt::JwtService;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::rate_limit::{create_rate_limiter, ClientRateLimiter, RateLimitLayer};
use services::security::security_headers;

const JSON_BODY_LIMIT: usize = 100 * 1024;
const RATE_LIMIT_PER_MINUTE: u32 = 120;
const RATE_LIMIT_BURST: u32 = 60;

pub struct AppState {
    pub db: DbPool,
    pub jwt_service: JwtService,
    pub directory: DirectoryStore,
    pub notifications: NotificationStore,
    pub settings: SettingsStore,
    pub metrics: Arc<MetricsRegistry>,
    pub rate_limiter: ClientRateLimiter,
    /// Key clients by forwarded headers instead of the socket peer.
    pub trust_proxy: bool,
}

impl AppState {
    /// Builds the state with freshly seeded in-memory stores.
    pub async fn new(db: DbPool, jwt_service: JwtService) -> Result<Self, prometheus::Error> {
        let metrics = MetricsRegistry::new()?;
        let directory = DirectoryStore::seeded();
        metrics.set_business_counts(&directory.status_counts().await);

        Ok(Self {
            db,
            jwt_service,
            directory,
            notifications: NotificationStore::seeded(),
            settings: SettingsStore::default(),
            metrics,
            rate_limiter: create_rate_limiter(RATE_LIMIT_PER_MINUTE, RATE_LIMIT_BURST),
            trust_proxy: false,
        })
    }

    pub fn with_trust_proxy(self, trust_proxy: bool) -> Self {
        Self { trust_proxy, ..self }
    }
}

/// Serve with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// rate limiter can key on the peer address.
pub fn create_app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .merge(directory_routes(state.clone()))
        .nest("/analysis", analysis_routes())
        .nest("/admin", admin_routes())
        .layer(RequestBodyLimitLayer::new(JSON_BODY_LIMIT))
        // Uploads carry their own limit, so they join after the JSON cap.
        .nest("/admin/imports", import_routes());

    Router::new()
        .nest("/api", api)
        .merge(metrics_routes(state.metrics.clone()))
        .layer(middleware::from_fn(security_headers))
        .layer(RateLimitLayer::new(state.rate_limiter.clone(), state.trust_proxy))
        .layer(middleware::from_fn_with_state(state.metrics.clone(), metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
