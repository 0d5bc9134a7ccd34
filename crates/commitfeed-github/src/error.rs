use chrono::{DateTime, Local};
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to decode {context}: {message}")]
    Decode {
        context: &'static str,
        message: String,
    },

    #[error("{}", rate_limit_message(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Local>> },

    #[error("failed to fetch {context}: {status}")]
    Http {
        context: &'static str,
        status: String,
    },
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}

fn rate_limit_message(reset_at: &Option<DateTime<Local>>) -> String {
    match reset_at {
        Some(at) => format!("rate limit exceeded, resets at {}", at.format("%Y-%m-%d %H:%M:%S %Z")),
        None => "rate limit exceeded".to_string(),
    }
}
