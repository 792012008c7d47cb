use crate::cli::{CommonArgs, FilterArgs};
use crate::error::{HotfilesError, Result};
use crate::filter::{normalize_prefix, parse_extensions, PathFilter};
use crate::model::{DateRangeFilter, FiltersUsed, OutputFormat, SortKey};
use regex::Regex;
use std::path::PathBuf;

/// Where the numstat text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Git { repo: Option<PathBuf> },
    File(PathBuf),
    Stdin,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct ChurnOptions {
    pub source: Source,
    pub max_commits: Option<usize>,
    pub since: Option<String>,
    pub until: Option<String>,
    /// Pathspec handed to git as typed, resolved by git against the directory it runs in.
    pub path: Option<String>,
    /// Repo-relative prefix applied to `--input` logs, which git never filtered.
    pub prefix: Option<String>,
    pub exclude: Option<Regex>,
    pub extensions: Vec<String>,
    pub sort: SortKey,
    pub top: usize,
    pub format: OutputFormat,
    pub verbose: bool,
    filters_used: FiltersUsed,
}

impl ChurnOptions {
    pub fn from_args(
        common: &CommonArgs,
        filters: &FilterArgs,
        sort: SortKey,
        top: usize,
        format: OutputFormat,
    ) -> Result<Self> {
        if top == 0 {
            return Err(HotfilesError::InvalidOption("--top must be at least 1".to_string()));
        }
        if common.commits == Some(0) {
            return Err(HotfilesError::InvalidOption("--commits must be at least 1".to_string()));
        }

        let exclude = filters.exclude.as_deref().map(Regex::new).transpose()?;
        let extensions = match filters.ext.as_deref() {
            Some(list) => parse_extensions(list)?,
            None => Vec::new(),
        };

        let source = match &common.input {
            Some(p) if p.as_os_str() == "-" => Source::Stdin,
            Some(p) => Source::File(p.clone()),
            None => Source::Git { repo: common.repo.clone() },
        };

        let filters_used = FiltersUsed {
            path: filters.path.clone(),
            exclude_pattern: filters.exclude.clone(),
            extensions: filters.ext.clone(),
            date_range: DateRangeFilter {
                since: common.since.clone(),
                until: common.until.clone(),
            },
        };

        Ok(Self {
            max_commits: common.commits,
            since: common.since.clone(),
            until: common.until.clone(),
            path: filters.path.clone(),
            prefix: match source {
                Source::Git { .. } => None,
                Source::File(_) | Source::Stdin => filters.path.as_deref().and_then(normalize_prefix),
            },
            exclude,
            extensions,
            sort,
            top,
            format,
            verbose: common.verbose,
            filters_used,
            source,
        })
    }

    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(self.prefix.clone(), self.exclude.clone(), self.extensions.clone())
    }

    /// Filters as the user typed them, for the JSON envelope.
    pub fn filters_used(&self) -> &FiltersUsed {
        &self.filters_used
    }
}
