use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Cumulative per-file counters. `changes` always equals `additions + deletions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    pub changes: u64,
    pub additions: u64,
    pub deletions: u64,
    pub commits: u64,
}

impl FileStat {
    /// Counters saturate at `u64::MAX` instead of wrapping on absurd input.
    pub fn record(&mut self, additions: u64, deletions: u64) {
        self.additions = self.additions.saturating_add(additions);
        self.deletions = self.deletions.saturating_add(deletions);
        self.changes = self.changes.saturating_add(additions.saturating_add(deletions));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnEntry {
    pub path: String,
    #[serde(flatten)]
    pub stat: FileStat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Changes,
    Additions,
    Deletions,
    Commits,
}

impl SortKey {
    pub fn value(self, stat: &FileStat) -> u64 {
        match self {
            SortKey::Changes => stat.changes,
            SortKey::Additions => stat.additions,
            SortKey::Deletions => stat.deletions,
            SortKey::Commits => stat.commits,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SortKey::Changes => "total lines changed",
            SortKey::Additions => "lines added",
            SortKey::Deletions => "lines deleted",
            SortKey::Commits => "commit count",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeFilter {
    pub since: Option<String>,
    pub until: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersUsed {
    pub path: Option<String>,
    pub exclude_pattern: Option<String>,
    pub extensions: Option<String>,
    pub date_range: DateRangeFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub total_files: usize,
    pub files_analyzed: usize,
    pub commits_analyzed: u64,
    pub sort_by: SortKey,
    pub filters: FiltersUsed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnReport {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub metadata: ReportMetadata,
    pub files: Vec<ChurnEntry>,
}

/// `--since`/`--until` values in a form git accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<String>,
    pub until: Option<String>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: String) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: String) -> Self {
        self.until = Some(until);
        self
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}
