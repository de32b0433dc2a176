use std::collections::HashMap;
use std::sync::{Arc, MutexGuard};
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::wizard::{Wizard, WizardHandle};
use crate::state::{AppState, Session};

fn sessions(state: &AppState) -> MutexGuard<'_, HashMap<Uuid, Session>> {
    state.sessions.lock().unwrap_or_else(|e| e.into_inner())
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Creates a wizard for one page load.
pub fn create_session(state: &Arc<AppState>) -> (Uuid, WizardHandle) {
    let removed = prune_expired(state, now());
    if removed > 0 {
        tracing::info!(removed, "pruned expired wizard sessions");
    }

    evict_over_capacity(state);

    let id = Uuid::new_v4();
    let handle = WizardHandle::new(
        Wizard::new(state.clock.clone()),
        state.sink.clone(),
        StdDuration::from_millis(state.config.submit_delay_ms),
    );
    sessions(state).insert(
        id,
        Session {
            handle: handle.clone(),
            last_activity: now(),
        },
    );

    tracing::debug!(%id, "created wizard session");
    (id, handle)
}

pub fn get_session(state: &Arc<AppState>, id: Uuid) -> Result<WizardHandle, AppError> {
    let mut sessions = sessions(state);
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("wizard {id}")))?;
    session.last_activity = now();
    Ok(session.handle.clone())
}

pub fn dispose_session(state: &Arc<AppState>, id: Uuid) -> Result<(), AppError> {
    if sessions(state).remove(&id).is_none() {
        return Err(AppError::NotFound(format!("wizard {id}")));
    }
    tracing::debug!(%id, "disposed wizard session");
    Ok(())
}

/// Drops sessions idle for longer than the configured TTL. Returns how many
/// were removed.
pub fn prune_expired(state: &AppState, now: NaiveDateTime) -> usize {
    let cutoff = now - Duration::minutes(state.config.session_ttl_minutes);
    let mut sessions = sessions(state);
    let before = sessions.len();
    sessions.retain(|_, s| s.last_activity >= cutoff);
    before - sessions.len()
}

/// Makes room for one more session by dropping the least recently active
/// ones once the registry is full.
fn evict_over_capacity(state: &AppState) {
    let max = state.config.max_sessions.max(1);
    let mut sessions = sessions(state);
    if sessions.len() < max {
        return;
    }

    let mut by_activity: Vec<(Uuid, NaiveDateTime)> = sessions
        .iter()
        .map(|(id, s)| (*id, s.last_activity))
        .collect();
    by_activity.sort_by_key(|(_, last)| *last);

    let excess = sessions.len() + 1 - max;
    for (id, _) in by_activity.into_iter().take(excess) {
        sessions.remove(&id);
    }
    tracing::warn!(evicted = excess, max, "wizard session limit reached");
}

/// Prunes expired sessions on a fixed interval, independent of traffic.
pub fn spawn_pruner(state: Arc<AppState>, every: StdDuration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = prune_expired(&state, now());
            if removed > 0 {
                tracing::info!(removed, "pruned expired wizard sessions");
            }
        }
    })
}
