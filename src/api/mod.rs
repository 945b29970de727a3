use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::services::{PostService, SlowTaskService};
use crate::state::SharedState;

mod admin;
mod error;
mod observability;
mod posts;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.shared.cache
    }

    #[must_use]
    pub fn post_service(&self) -> &Arc<dyn PostService> {
        &self.shared.post_service
    }

    #[must_use]
    pub fn slow_task(&self) -> &Arc<SlowTaskService> {
        &self.shared.slow_task
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, inactivity_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_inactivity_minutes,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(create_posts_router())
        .merge(create_admin_router())
        .route("/api/system/status", get(system::get_status))
        .route("/api/system/health/live", get(system::health_live))
        .route("/api/system/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

fn create_posts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/external/posts", get(posts::index))
        .route("/external/posts/", get(posts::index))
        .route(
            "/external/posts/new",
            get(posts::new_form).post(posts::create),
        )
        .route("/external/posts/{id}", get(posts::show).post(posts::delete))
        .route(
            "/external/posts/{id}/edit",
            get(posts::edit_form).post(posts::update),
        )
}

fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route(
            "/admin/api/ingredients",
            get(admin::list_ingredients).post(admin::create_ingredient),
        )
        .route(
            "/admin/api/ingredients/{id}",
            get(admin::get_ingredient)
                .put(admin::rename_ingredient)
                .delete(admin::delete_ingredient),
        )
        .route(
            "/admin/api/recipes",
            get(admin::list_recipes).post(admin::create_recipe),
        )
        .route(
            "/admin/api/recipes/{id}",
            get(admin::get_recipe)
                .put(admin::replace_recipe)
                .delete(admin::delete_recipe),
        )
        .route(
            "/admin/api/users",
            get(admin::list_users).post(admin::create_user),
        )
}
