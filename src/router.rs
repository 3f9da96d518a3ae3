use crate::config::Config;
use crate::db::DocumentStore;
use crate::handlers::{admin, auth, index};
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::get,
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Largest accepted request body (form or JSON).
pub const BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    key: Key,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<dyn DocumentStore>, key: Key) -> Self {
        Self { config, store, key }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn verse_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.storage.public_dir);

    let auth_routes = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout));
    let admin_routes = Router::new().route("/", get(admin::dashboard));

    Router::new()
        .route("/", get(index::home))
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes)
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
