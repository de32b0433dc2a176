use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::derived::{view, WizardView};
use crate::services::render::render_wizard;
use crate::services::sessions::{create_session, dispose_session, get_session};
use crate::services::wizard::{Action, SubmitOutcome, WizardHandle};
use crate::state::AppState;

#[derive(Serialize)]
pub struct WizardResponse {
    id: Uuid,
    #[serde(flatten)]
    view: WizardView,
}

fn respond(id: Uuid, handle: &WizardHandle) -> WizardResponse {
    let (draft, today) = handle.snapshot();
    WizardResponse {
        id,
        view: view(&draft, today),
    }
}

// POST /api/wizards
pub async fn create_wizard(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<WizardResponse>) {
    let (id, handle) = create_session(&state);
    (StatusCode::CREATED, Json(respond(id, &handle)))
}

// GET /api/wizards/:id
pub async fn get_wizard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let handle = get_session(&state, id)?;
    Ok(Json(respond(id, &handle)))
}

// GET /api/wizards/:id/markup
pub async fn get_markup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let handle = get_session(&state, id)?;
    let (draft, today) = handle.snapshot();
    Ok(Html(render_wizard(&view(&draft, today))))
}

// POST /api/wizards/:id/actions
pub async fn dispatch_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(action): Json<Action>,
) -> Result<Json<WizardResponse>, AppError> {
    let handle = get_session(&state, id)?;
    tracing::debug!(%id, ?action, "wizard action");
    handle.dispatch(action);
    Ok(Json(respond(id, &handle)))
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum OutcomeKind {
    Submitted,
    Invalid,
    Ignored,
    SinkFailed,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    outcome: OutcomeKind,
    wizard: WizardResponse,
}

// POST /api/wizards/:id/submit
pub async fn submit_wizard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, AppError> {
    let handle = get_session(&state, id)?;
    let outcome = match handle.submit().await {
        SubmitOutcome::Submitted(record) => {
            tracing::info!(%id, booking = %record.summary(), "reservation confirmed");
            OutcomeKind::Submitted
        }
        SubmitOutcome::Invalid(_) => OutcomeKind::Invalid,
        SubmitOutcome::Ignored => OutcomeKind::Ignored,
        SubmitOutcome::SinkFailed => OutcomeKind::SinkFailed,
    };

    Ok(Json(SubmitResponse {
        outcome,
        wizard: respond(id, &handle),
    }))
}

// DELETE /api/wizards/:id
pub async fn dispose_wizard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    dispose_session(&state, id)?;
    Ok(StatusCode::NO_CONTENT)
}
