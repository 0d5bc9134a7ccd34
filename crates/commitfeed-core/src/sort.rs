use std::fmt;

use serde::{Deserialize, Serialize};

use crate::commit::CommitRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Only the literal `asc` sorts ascending; every other value,
    /// including typos and the empty string, is descending.
    pub fn parse_str(s: &str) -> Self {
        if s == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable sort by commit date.
pub fn sort_commits(commits: &mut [CommitRecord], order: SortOrder) {
    match order {
        SortOrder::Asc => commits.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::Desc => commits.sort_by(|a, b| b.date.cmp(&a.date)),
    }
}
