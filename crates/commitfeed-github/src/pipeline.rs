use std::fmt;

use chrono::{DateTime, Utc};
use commitfeed_core::sort::{sort_commits, SortOrder};
use commitfeed_core::window::{is_within, recency_cutoff};
use commitfeed_core::commit::PUBLIC_API_ENDPOINT;
use commitfeed_core::CommitRecord;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::events::fetch_page;
use crate::pulls::resolve_pr;
use crate::transport::Transport;

/// Which records get a PR lookup after each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnrichScope {
    /// Every record accumulated so far, so earlier pages are re-queried on
    /// each later page.
    #[default]
    Accumulated,
    /// Only the records the current page added.
    NewOnly,
}

impl EnrichScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichScope::Accumulated => "all",
            EnrichScope::NewOnly => "new",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(EnrichScope::Accumulated),
            "new" => Some(EnrichScope::NewOnly),
            _ => None,
        }
    }
}

impl fmt::Display for EnrichScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub username: String,
    pub token: String,
    pub sort_order: SortOrder,
    /// Recency window in months. Must be positive.
    pub months_back: i64,
    pub map_prs: bool,
    pub enrich_scope: EnrichScope,
    /// API base URL, e.g. `https://api.github.com`.
    pub endpoint: String,
}

impl FetchRequest {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            sort_order: SortOrder::default(),
            months_back: 1,
            map_prs: false,
            enrich_scope: EnrichScope::default(),
            endpoint: PUBLIC_API_ENDPOINT.to_string(),
        }
    }

    /// Checked before any request goes out. Returns the window in months.
    pub fn validate(&self) -> Result<u32, FetchError> {
        if self.months_back <= 0 {
            return Err(FetchError::InvalidConfig(
                "date range must be a positive integer".into(),
            ));
        }
        let months = u32::try_from(self.months_back).map_err(|_| {
            FetchError::InvalidConfig(format!("date range too large: {}", self.months_back))
        })?;
        if self.username.trim().is_empty() {
            return Err(FetchError::InvalidConfig("username is required".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(FetchError::InvalidConfig("endpoint is required".into()));
        }
        Ok(months)
    }
}

/// Drives pagination, windowing, optional PR enrichment and final ordering.
///
/// Runs strictly in page order on the calling thread. Any page failure ends
/// the run with no partial result; PR lookup failures only cost that one
/// record its enrichment.
pub struct CommitFetcher<T> {
    transport: T,
}

impl<T: Transport> CommitFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn run(&self, req: &FetchRequest) -> Result<Vec<CommitRecord>, FetchError> {
        self.run_at(req, Utc::now())
    }

    /// [`run`](Self::run) with an explicit clock. The cutoff is computed
    /// once from `now` and reused for every page.
    pub fn run_at(
        &self,
        req: &FetchRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<CommitRecord>, FetchError> {
        let months = req.validate()?;
        let cutoff = recency_cutoff(now, months).ok_or_else(|| {
            FetchError::InvalidConfig(format!("date range out of bounds: {months} months"))
        })?;
        debug!("collecting push events for {} after {cutoff}", req.username);

        let mut commits: Vec<CommitRecord> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let events = fetch_page(
                &self.transport,
                &req.endpoint,
                &req.username,
                &req.token,
                page,
            )?;

            if events.is_empty() {
                debug!("page {page} has no push events, stopping");
                break;
            }

            let page_start = commits.len();
            for event in events {
                let Some(date) = event.timestamp() else {
                    warn!(
                        "dropping push event to {:?} with bad timestamp {:?}",
                        event.repo_name(),
                        event.created_at
                    );
                    continue;
                };
                if is_within(&date, &cutoff) {
                    commits.extend(event.into_records(date));
                }
            }

            if req.map_prs {
                let from = match req.enrich_scope {
                    EnrichScope::Accumulated => 0,
                    EnrichScope::NewOnly => page_start,
                };
                self.enrich(&mut commits[from..], req);
            }

            page += 1;
        }

        sort_commits(&mut commits, req.sort_order);
        info!("total commits processed: {}", commits.len());

        Ok(commits)
    }

    /// A failed lookup leaves the record's current value alone.
    fn enrich(&self, commits: &mut [CommitRecord], req: &FetchRequest) {
        for commit in commits.iter_mut() {
            match resolve_pr(
                &self.transport,
                &req.endpoint,
                &commit.repository,
                &commit.sha,
                &req.token,
            ) {
                Ok(url) => commit.pr_url = Some(url),
                Err(e) => warn!(
                    "failed to find PR for {}@{}: {e}",
                    commit.repository, commit.sha
                ),
            }
        }
    }
}
