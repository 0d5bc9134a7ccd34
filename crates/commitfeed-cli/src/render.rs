use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use commitfeed_core::CommitRecord;

use crate::config::OutputType;

/// Console message width, ellipsis included.
pub const MAX_MESSAGE_LEN: usize = 50;

const TABLE_HEADER: &str = "SHA\tDate\tAuthor\tMessage\tURL\tPR";
const CSV_HEADER: [&str; 5] = ["SHA", "Date", "Author", "Message", "link"];

/// First line-flattened `MAX_MESSAGE_LEN` chars of a message. Counts chars,
/// not bytes, so multi-byte text is never split.
pub fn truncate_message(message: &str) -> String {
    let flat: String = message
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() <= MAX_MESSAGE_LEN {
        return flat;
    }
    let head: String = flat.chars().take(MAX_MESSAGE_LEN - 3).collect();
    format!("{head}...")
}

pub fn write_table<W: Write>(out: &mut W, commits: &[CommitRecord], web_base: &str) -> io::Result<()> {
    writeln!(out, "{TABLE_HEADER}")?;
    writeln!(out, "{}", "-".repeat(TABLE_HEADER.len()))?;
    for commit in commits {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            commit.sha,
            commit.local_date(),
            commit.author,
            truncate_message(&commit.message),
            commit.commit_url(web_base),
            commit.pr_url_or_empty(),
        )?;
    }
    Ok(())
}

/// Full messages; the csv writer handles quoting of commas, quotes and
/// newlines.
pub fn write_csv<W: Write>(out: W, commits: &[CommitRecord], web_base: &str) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for commit in commits {
        writer.write_record([
            commit.sha.as_str(),
            commit.local_date().as_str(),
            commit.author.as_str(),
            commit.message.as_str(),
            commit.commit_url(web_base).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, commits: &[CommitRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, commits)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write `commits` to `path` in a file format. Console output is not a file
/// format and is rejected.
pub fn write_file(
    format: OutputType,
    path: &Path,
    commits: &[CommitRecord],
    web_base: &str,
) -> Result<()> {
    let written = match format {
        OutputType::Csv => write_csv(create(path)?, commits, web_base),
        OutputType::Json => write_json(create(path)?, commits),
        OutputType::Console => anyhow::bail!("console output cannot be written to a file"),
    };
    written.with_context(|| format!("write {}", path.display()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
