use crate::aggregate::{Aggregator, ChurnTable};
use crate::filter::PathFilter;
use crate::git::{GitRepo, LogQuery};
use crate::model::{ChurnEntry, OutputFormat};
use crate::numstat::Record;
use crate::options::{ChurnOptions, Source};
use crate::output::{build_report, output_json, output_ndjson, output_table};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use tracing::info;

pub fn exec(opts: &ChurnOptions) -> anyhow::Result<()> {
    info!(
        event = "run.started",
        sort = ?opts.sort,
        top = opts.top,
        path = ?opts.path,
        extensions = ?opts.extensions
    );

    let log = read_log(opts)?;
    let table = aggregate_with_progress(&log, opts.path_filter(), opts.verbose);
    let files_analyzed = table.len();
    let commits_analyzed = table.commits();
    info!(event = "aggregate.completed", files = files_analyzed, commits = commits_analyzed);

    let ranked: Vec<ChurnEntry> = table.into_ranked(opts.sort, opts.top);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match opts.format {
        OutputFormat::Json => {
            let report = build_report(&ranked, opts, files_analyzed, commits_analyzed);
            output_json(&mut out, &report)?
        }
        OutputFormat::Ndjson => output_ndjson(&mut out, &ranked)?,
        OutputFormat::Table => output_table(&mut out, &ranked, opts)?,
    }

    info!(event = "run.completed", rows = ranked.len());
    Ok(())
}

fn read_log(opts: &ChurnOptions) -> anyhow::Result<String> {
    match &opts.source {
        Source::Git { repo } => {
            let repo = GitRepo::open(repo.as_ref()).context("Failed to open git repository")?;
            let range = repo
                .resolve_range(opts.since.as_deref(), opts.until.as_deref())
                .context("Failed to resolve date range")?;
            let query = LogQuery {
                max_commits: opts.max_commits,
                range,
                path: opts.path.clone(),
            };
            repo.numstat_log(&query).context("Failed to read git log")
        }
        Source::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read numstat log from {}", path.display())),
        Source::Stdin => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read numstat log from stdin")?;
            Ok(buf)
        }
    }
}

/// Aggregates the whole log, spinning a commit counter on stderr when `verbose`.
pub fn aggregate_with_progress(log: &str, filter: PathFilter, verbose: bool) -> ChurnTable {
    let pb = if verbose {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {pos} commits {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("aggregating...");
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut aggregator = Aggregator::new(filter);
    for line in log.lines() {
        if let Record::Commit(_) = aggregator.push_line(line) {
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    aggregator.finish()
}
