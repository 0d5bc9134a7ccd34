use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::rate_limit::{self, Endpoint};
use crate::transport::{auth_header, Transport};

/// Media type that exposes the commit → pull request association.
pub const PREVIEW_ACCEPT: &str = "application/vnd.github.groot-preview+json";

#[derive(Debug, Deserialize)]
struct PullSummary {
    #[serde(default)]
    html_url: String,
}

pub fn pulls_url(endpoint: &str, repository: &str, sha: &str) -> String {
    format!(
        "{}/repos/{repository}/commits/{sha}/pulls",
        endpoint.trim_end_matches('/')
    )
}

/// Web URL of the first pull request associated with `sha`, or an empty
/// string when the commit has none.
pub fn resolve_pr<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    repository: &str,
    sha: &str,
    token: &str,
) -> Result<String, FetchError> {
    let url = pulls_url(endpoint, repository, sha);
    let resp = transport.get(
        &url,
        &[auth_header(token), ("Accept", PREVIEW_ACCEPT.to_string())],
    )?;
    rate_limit::check(&resp, Endpoint::Pulls)?;

    let pulls: Vec<PullSummary> =
        serde_json::from_str(&resp.body).map_err(|e| FetchError::Decode {
            context: "pull requests",
            message: e.to_string(),
        })?;

    let pr_url = pulls
        .into_iter()
        .next()
        .map(|p| p.html_url)
        .unwrap_or_default();
    debug!("{repository}@{sha}: pr={pr_url:?}");
    Ok(pr_url)
}
