pub mod health;
pub mod site;
pub mod wizard;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(site::landing_page))
        .route("/api/services", get(site::services))
        .route("/api/time-slots", get(site::time_slots))
        .route("/api/animations", get(site::animations))
        .route("/api/wizards", post(wizard::create_wizard))
        .route(
            "/api/wizards/:id",
            get(wizard::get_wizard).delete(wizard::dispose_wizard),
        )
        .route("/api/wizards/:id/markup", get(wizard::get_markup))
        .route("/api/wizards/:id/actions", post(wizard::dispatch_action))
        .route("/api/wizards/:id/submit", post(wizard::submit_wizard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
