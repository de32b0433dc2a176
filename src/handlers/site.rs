use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;

use crate::models::animation::site_animations;
use crate::models::{AnimationSequence, Service, SERVICES, TIME_SLOTS};
use crate::services::derived::view;
use crate::services::render::{mount, render_wizard};
use crate::services::sessions::create_session;
use crate::state::AppState;

static INDEX_HTML: &str = include_str!("../web/index.html");

// GET /
pub async fn landing_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let (id, handle) = create_session(&state);
    let (draft, today) = handle.snapshot();
    let fragment = format!(
        r#"<div data-wizard-id="{id}">{}</div>"#,
        render_wizard(&view(&draft, today))
    );

    let business_name = html_escape::encode_text(&state.config.business_name);
    let page = INDEX_HTML.replace("{{business_name}}", &business_name);
    Html(mount(&page, &state.config.mount_id, &fragment))
}

// GET /api/services
pub async fn services() -> Json<&'static [Service]> {
    Json(&SERVICES[..])
}

// GET /api/time-slots
pub async fn time_slots() -> Json<&'static [&'static str]> {
    Json(&TIME_SLOTS[..])
}

// GET /api/animations
pub async fn animations() -> Json<Vec<AnimationSequence>> {
    Json(site_animations())
}
