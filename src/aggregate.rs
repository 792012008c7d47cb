use crate::filter::PathFilter;
use crate::model::{ChurnEntry, FileStat, SortKey};
use crate::numstat::{parse_line, Record};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Per-file statistics in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ChurnTable {
    index: HashMap<String, usize>,
    entries: Vec<ChurnEntry>,
    commits: u64,
}

impl ChurnTable {
    fn slot(&mut self, path: &str) -> &mut FileStat {
        let idx = match self.index.get(path) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(path.to_string(), idx);
                self.entries.push(ChurnEntry {
                    path: path.to_string(),
                    stat: FileStat::default(),
                });
                idx
            }
        };
        &mut self.entries[idx].stat
    }

    pub fn get(&self, path: &str) -> Option<&FileStat> {
        self.index.get(path).map(|&idx| &self.entries[idx].stat)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of commit markers consumed.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn entries(&self) -> &[ChurnEntry] {
        &self.entries
    }

    /// Sorts descending by `key` and keeps the first `top` rows. Ties keep first-seen order.
    pub fn into_ranked(self, key: SortKey, top: usize) -> Vec<ChurnEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| key.value(&b.stat).cmp(&key.value(&a.stat)));
        entries.truncate(top);
        entries
    }
}

/// Single-pass accumulator over numstat lines.
pub struct Aggregator {
    filter: PathFilter,
    table: ChurnTable,
    in_commit: bool,
    modified_in_commit: HashSet<String>,
}

impl Aggregator {
    pub fn new(filter: PathFilter) -> Self {
        Self {
            filter,
            table: ChurnTable::default(),
            in_commit: false,
            modified_in_commit: HashSet::new(),
        }
    }

    pub fn push_line<'a>(&mut self, line: &'a str) -> Record<'a> {
        let record = parse_line(line);
        match record {
            Record::Blank => {}
            Record::Commit(_) => {
                self.flush_commit();
                self.in_commit = true;
                self.table.commits += 1;
            }
            Record::Hunk {
                additions,
                deletions,
                path,
            } => {
                if !self.in_commit {
                    trace!(event = "aggregate.hunk_outside_commit", path);
                } else if self.filter.admits(path) {
                    self.table.slot(path).record(additions, deletions);
                    if !self.modified_in_commit.contains(path) {
                        self.modified_in_commit.insert(path.to_string());
                    }
                }
            }
            Record::Skip => trace!(event = "aggregate.line_skipped", line),
        }
        record
    }

    pub fn commits_seen(&self) -> u64 {
        self.table.commits
    }

    /// Flushes the last commit and returns the table.
    pub fn finish(mut self) -> ChurnTable {
        self.flush_commit();
        self.table
    }

    fn flush_commit(&mut self) {
        for path in self.modified_in_commit.drain() {
            if let Some(&idx) = self.table.index.get(&path) {
                self.table.entries[idx].stat.commits += 1;
            }
        }
    }
}

pub fn aggregate_lines<'a, I>(lines: I, filter: PathFilter) -> ChurnTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut aggregator = Aggregator::new(filter);
    for line in lines {
        aggregator.push_line(line);
    }
    aggregator.finish()
}
