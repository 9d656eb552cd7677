use std::env;
use std::time::Duration;

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub webhook_url: String,
    /// Unset means outbound calls wait as long as the backend takes.
    pub request_timeout: Option<Duration>,
    pub flow_idle_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let request_timeout = match env::var("BOOKING_TIMEOUT_SECS") {
            Ok(v) if !v.trim().is_empty() => {
                let secs: u64 = v.trim().parse().map_err(|_| {
                    AppError::Config(format!("BOOKING_TIMEOUT_SECS must be a number, got {v:?}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            webhook_url: env::var("BOOKING_WEBHOOK_URL")
                .unwrap_or_else(|_| "http://localhost:5678/webhook/agendamiento".to_string()),
            request_timeout,
            flow_idle_timeout: Duration::from_secs(
                env::var("FLOW_IDLE_MINUTES")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(30)
                    * 60,
            ),
        })
    }
}
