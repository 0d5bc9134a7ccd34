use chrono::{DateTime, FixedOffset};
use commitfeed_core::window::parse_timestamp;
use commitfeed_core::CommitRecord;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::rate_limit::{self, Endpoint};
use crate::transport::{auth_header, Transport};

/// One entry of the activity feed. Only push events are modelled; every
/// other type is decoded just far enough to read its tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PushEvent(PushEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    /// Kept raw and optional; a missing or bad timestamp drops the event
    /// later instead of failing the whole page decode.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub repo: Option<RepoRef>,
    #[serde(default)]
    pub payload: PushPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub commits: Vec<PushCommit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushCommit {
    pub sha: String,
    #[serde(default)]
    pub author: CommitAuthor,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: String,
}

impl PushEvent {
    /// `None` when `created_at` is absent, null, or not RFC3339 with an
    /// offset.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.created_at.as_deref()?).ok()
    }

    pub fn repo_name(&self) -> &str {
        self.repo.as_ref().map(|r| r.name.as_str()).unwrap_or("")
    }

    /// One record per embedded commit, all stamped with the event's repo
    /// and `date`. Commits without a sha, or events without a repo name,
    /// yield nothing.
    pub fn into_records(self, date: DateTime<FixedOffset>) -> Vec<CommitRecord> {
        let repository = match self.repo {
            Some(repo) if !repo.name.is_empty() => repo.name,
            _ => {
                warn!("skipping push event at {date} with no repository");
                return Vec::new();
            }
        };

        self.payload
            .commits
            .into_iter()
            .filter(|c| {
                if c.sha.is_empty() {
                    warn!("skipping commit with empty sha in {repository}");
                    return false;
                }
                true
            })
            .map(|c| CommitRecord {
                sha: c.sha,
                repository: repository.clone(),
                author: c.author.name,
                message: c.message,
                date,
                pr_url: None,
            })
            .collect()
    }
}

pub fn events_url(endpoint: &str, username: &str, page: u32) -> String {
    format!(
        "{}/users/{username}/events?page={page}",
        endpoint.trim_end_matches('/')
    )
}

/// Fetch one page of the user's event feed and keep only push events.
///
/// An empty result means the feed is exhausted. Transport failures,
/// undecodable bodies and rate-limit signals are all errors.
pub fn fetch_page<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    username: &str,
    token: &str,
    page: u32,
) -> Result<Vec<PushEvent>, FetchError> {
    let url = events_url(endpoint, username, page);
    debug!("fetching events page {page} for {username}");

    let resp = transport.get(&url, &[auth_header(token)])?;
    rate_limit::check(&resp, Endpoint::Events)?;

    let events: Vec<Event> = serde_json::from_str(&resp.body).map_err(|e| FetchError::Decode {
        context: "events",
        message: e.to_string(),
    })?;

    let total = events.len();
    let pushes: Vec<PushEvent> = events
        .into_iter()
        .filter_map(|e| match e {
            Event::PushEvent(push) => Some(push),
            Event::Other => None,
        })
        .collect();

    debug!("page {page}: {} push events of {total}", pushes.len());
    Ok(pushes)
}
