//! Classifies a response as usable, throttled, or failed. Never retries.

use chrono::{DateTime, Local};

use crate::error::FetchError;
use crate::transport::HttpResponse;

pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/users/{user}/events`
    Events,
    /// `/repos/{repo}/commits/{sha}/pulls`
    Pulls,
}

impl Endpoint {
    pub fn context(&self) -> &'static str {
        match self {
            Endpoint::Events => "commits",
            Endpoint::Pulls => "pull requests",
        }
    }

    /// The events listing stops pre-emptively once the remaining budget hits
    /// zero, even on a 200.
    fn checks_remaining(&self) -> bool {
        matches!(self, Endpoint::Events)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Ok,
    RateLimited { reset_at: DateTime<Local> },
    RateLimitedUnknown,
    HttpError { status: String },
}

pub fn classify(resp: &HttpResponse, endpoint: Endpoint) -> Classification {
    match resp.status {
        200 => {
            if endpoint.checks_remaining() && budget_exhausted(resp) {
                throttled(resp)
            } else {
                Classification::Ok
            }
        }
        403 => throttled(resp),
        _ => Classification::HttpError {
            status: resp.status_text.clone(),
        },
    }
}

/// [`classify`] folded into the error taxonomy.
pub fn check(resp: &HttpResponse, endpoint: Endpoint) -> Result<(), FetchError> {
    match classify(resp, endpoint) {
        Classification::Ok => Ok(()),
        Classification::RateLimited { reset_at } => Err(FetchError::RateLimited {
            reset_at: Some(reset_at),
        }),
        Classification::RateLimitedUnknown => Err(FetchError::RateLimited { reset_at: None }),
        Classification::HttpError { status } => Err(FetchError::Http {
            context: endpoint.context(),
            status,
        }),
    }
}

/// Present and parsing to a non-positive integer. A missing or garbled
/// header is not treated as exhaustion.
fn budget_exhausted(resp: &HttpResponse) -> bool {
    resp.header(REMAINING_HEADER)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .is_some_and(|remaining| remaining <= 0)
}

fn throttled(resp: &HttpResponse) -> Classification {
    match reset_time(resp) {
        Some(reset_at) => Classification::RateLimited { reset_at },
        None => Classification::RateLimitedUnknown,
    }
}

fn reset_time(resp: &HttpResponse) -> Option<DateTime<Local>> {
    let secs = resp.header(RESET_HEADER)?.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0).map(|at| at.with_timezone(&Local))
}
