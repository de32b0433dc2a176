use std::env;
use std::str::FromStr;

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub business_name: String,
    /// Element id the reservation wizard renders into.
    pub mount_id: String,
    pub submit_delay_ms: u64,
    pub session_ttl_minutes: i64,
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            business_name: "Elegance Nails Ostrava".to_string(),
            mount_id: "reservation".to_string(),
            submit_delay_ms: 1500,
            session_ttl_minutes: 30,
            max_sessions: 1000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            business_name: env::var("BUSINESS_NAME").unwrap_or(defaults.business_name),
            mount_id: env::var("MOUNT_ID").unwrap_or(defaults.mount_id),
            submit_delay_ms: parse_var("SUBMIT_DELAY_MS", defaults.submit_delay_ms)?,
            session_ttl_minutes: parse_var("SESSION_TTL_MINUTES", defaults.session_ttl_minutes)?,
            max_sessions: parse_var("MAX_SESSIONS", defaults.max_sessions)?,
        })
    }
}
