pub mod config;
pub mod render;

use std::io::Write;

use anyhow::Result;
use commitfeed_core::commit::web_base;
use commitfeed_github::{CommitFetcher, Transport};
use tracing::info;

use crate::config::FetchCommitsArgs;

/// Run `fetch-commits` over the given transport and render the result:
/// the console table goes to `out`, file formats go to their output path.
///
/// Returns the number of commits rendered.
pub fn fetch_commits<T: Transport, W: Write>(
    args: &FetchCommitsArgs,
    transport: T,
    out: &mut W,
) -> Result<usize> {
    let request = args.to_request();
    info!(
        "fetching commits for {} over the past {} month(s)",
        request.username, request.months_back
    );

    let commits = CommitFetcher::new(transport).run(&request)?;
    let web = web_base(&request.endpoint);

    match args.output_path() {
        None => render::write_table(out, &commits, &web)?,
        Some(path) => {
            render::write_file(args.output_type, &path, &commits, &web)?;
            info!("wrote {} commits to {}", commits.len(), path.display());
        }
    }

    Ok(commits.len())
}
