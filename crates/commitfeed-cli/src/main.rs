use anyhow::Result;
use clap::Parser;
use commitfeed_cli::config::{Cli, Command};
use commitfeed_github::BlockingTransport;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::FetchCommits(args) => {
            let transport = BlockingTransport::new(args.request_timeout())?;
            let mut stdout = std::io::stdout().lock();
            commitfeed_cli::fetch_commits(&args, transport, &mut stdout)?;
        }
    }

    Ok(())
}
