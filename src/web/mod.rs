use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::db::Store;
use crate::services::Mailer;

mod admin;
pub mod auth;
mod error;
mod home;
mod pages;
mod signup;
mod validation;

pub use auth::AdminPrincipal;
pub use error::WebError;

/// Shared handler dependencies, constructed once at startup and injected
/// into every route.
pub struct AppState {
    pub store: Store,

    pub mailer: Arc<Mailer>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/create-workshop", post(admin::create_workshop))
        .route("/admin/change-password", post(admin::change_password))
        .route("/admin/export-csv", get(admin::export_csv))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/", get(home::home))
        .route("/signup", post(signup::submit))
        .route("/health", get(health))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
