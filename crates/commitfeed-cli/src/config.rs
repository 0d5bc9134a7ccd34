use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use commitfeed_core::commit::PUBLIC_API_ENDPOINT;
use commitfeed_core::SortOrder;
use commitfeed_github::{EnrichScope, FetchRequest};

#[derive(Debug, Parser)]
#[command(
    name = "commitfeed",
    about = "Push-commit history from a user's public activity feed"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a user's recent push commits
    FetchCommits(FetchCommitsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    Console,
    Csv,
    Json,
}

impl OutputType {
    pub fn default_file(&self) -> Option<&'static str> {
        match self {
            OutputType::Console => None,
            OutputType::Csv => Some("output.csv"),
            OutputType::Json => Some("output.json"),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FetchCommitsArgs {
    /// API token
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Whose activity feed to read
    #[arg(short, long)]
    pub username: String,

    /// Recency window in months. Must be positive.
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    pub date_range: i64,

    /// `asc` for oldest first; anything else is newest first
    #[arg(short, long, default_value = "desc")]
    pub sort_order: String,

    /// Look up the pull request behind each commit
    #[arg(long)]
    pub map_pr: bool,

    /// PR lookup scope per page: `all` re-checks every commit collected so
    /// far, `new` only the commits that page added
    #[arg(long, default_value = "all", value_parser = parse_enrich_scope)]
    pub enrich_scope: EnrichScope,

    /// API base URL
    #[arg(long, env = "GITHUB_API_ENDPOINT", default_value = PUBLIC_API_ENDPOINT)]
    pub endpoint: String,

    #[arg(short = 'x', long, value_enum, default_value_t = OutputType::Console)]
    pub output_type: OutputType,

    /// Output file for csv/json. Defaults to output.csv / output.json.
    #[arg(short = 'f', long)]
    pub output_file: Option<PathBuf>,

    /// Per-request timeout (seconds)
    #[arg(long, env = "COMMITFEED_TIMEOUT", default_value = "10")]
    pub timeout: u64,
}

impl FetchCommitsArgs {
    pub fn to_request(&self) -> FetchRequest {
        FetchRequest {
            username: self.username.clone(),
            token: self.github_token.clone(),
            sort_order: SortOrder::parse_str(&self.sort_order),
            months_back: self.date_range,
            map_prs: self.map_pr,
            enrich_scope: self.enrich_scope,
            endpoint: self.endpoint.clone(),
        }
    }

    /// Where file output goes; `None` means the console table.
    pub fn output_path(&self) -> Option<PathBuf> {
        let default = self.output_type.default_file()?;
        Some(
            self.output_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(default)),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn parse_enrich_scope(s: &str) -> Result<EnrichScope, String> {
    EnrichScope::parse_str(s).ok_or_else(|| format!("expected `all` or `new`, got `{s}`"))
}
