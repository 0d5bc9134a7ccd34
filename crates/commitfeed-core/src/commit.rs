use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

pub const PUBLIC_API_ENDPOINT: &str = "https://api.github.com";
pub const PUBLIC_WEB_BASE: &str = "https://github.com";

/// Display format for commit dates, rendered in the local timezone.
pub const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One commit pulled out of a push event.
///
/// `date` is the push event's `created_at`, not the commit's own authored
/// date; it is what recency filtering and ordering use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    /// `owner/name`
    pub repository: String,
    pub author: String,
    pub message: String,
    pub date: DateTime<FixedOffset>,
    /// Associated pull request. `None` when PR mapping is off or the lookup
    /// failed; `Some("")` when the lookup succeeded but found no PR.
    #[serde(default)]
    pub pr_url: Option<String>,
}

impl CommitRecord {
    pub fn commit_url(&self, web_base: &str) -> String {
        format!(
            "{}/{}/commit/{}",
            web_base.trim_end_matches('/'),
            self.repository,
            self.sha
        )
    }

    pub fn local_date(&self) -> String {
        self.date
            .with_timezone(&Local)
            .format(LOCAL_DATE_FORMAT)
            .to_string()
    }

    pub fn pr_url_or_empty(&self) -> &str {
        self.pr_url.as_deref().unwrap_or("")
    }
}

/// Derive the browsable web base from an API endpoint.
///
/// `https://api.github.com` maps to `https://github.com` and an enterprise
/// `https://ghe.example.com/api/v3` maps to `https://ghe.example.com`.
/// Anything else, including other `https://api.*` hosts, is returned
/// unchanged.
pub fn web_base(api_endpoint: &str) -> String {
    let endpoint = api_endpoint.trim_end_matches('/');
    if endpoint == PUBLIC_API_ENDPOINT {
        return PUBLIC_WEB_BASE.to_string();
    }
    if let Some(base) = endpoint.strip_suffix("/api/v3") {
        return base.to_string();
    }
    endpoint.to_string()
}
