use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::services::sink::BookingSink;
use crate::services::wizard::{Clock, WizardHandle};

pub struct Session {
    pub handle: WizardHandle,
    pub last_activity: NaiveDateTime,
}

pub struct AppState {
    pub config: AppConfig,
    pub clock: Arc<dyn Clock>,
    pub sink: Arc<dyn BookingSink>,
    pub sessions: Mutex<HashMap<Uuid, Session>>,
}

impl AppState {
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>, sink: Arc<dyn BookingSink>) -> Self {
        Self {
            config,
            clock,
            sink,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}
