use crate::model::{ChurnEntry, ChurnReport, ReportMetadata, SortKey, SCHEMA_VERSION};
use crate::options::ChurnOptions;
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::io::Write;

const RULE_WIDTH: usize = 100;

pub fn build_report(entries: &[ChurnEntry], opts: &ChurnOptions, files_analyzed: usize, commits_analyzed: u64) -> ChurnReport {
    ChurnReport {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        metadata: ReportMetadata {
            total_files: entries.len(),
            files_analyzed,
            commits_analyzed,
            sort_by: opts.sort,
            filters: opts.filters_used().clone(),
        },
        files: entries.to_vec(),
    }
}

pub fn output_json<W: Write>(out: &mut W, report: &ChurnReport) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

pub fn output_ndjson<W: Write>(out: &mut W, entries: &[ChurnEntry]) -> Result<()> {
    for e in entries {
        writeln!(out, "{}", serde_json::to_string(e)?)?;
    }
    Ok(())
}

pub fn output_table<W: Write>(out: &mut W, entries: &[ChurnEntry], opts: &ChurnOptions) -> Result<()> {
    if let (Some(since), Some(until)) = (&opts.since, &opts.until) {
        writeln!(out, "Filtering commits from {} to {}", since, until)?;
    } else if let Some(since) = &opts.since {
        writeln!(out, "Filtering commits since {}", since)?;
    } else if let Some(until) = &opts.until {
        writeln!(out, "Filtering commits until {}", until)?;
    }

    if entries.is_empty() {
        writeln!(out, "No data to display")?;
        return Ok(());
    }

    write_table(out, entries, opts.top, opts.sort)
}

fn write_table<W: Write>(out: &mut W, entries: &[ChurnEntry], top: usize, sort: SortKey) -> Result<()> {
    writeln!(
        out,
        "\n{}",
        style(format!("Top {} most modified files (by {}):", top, sort.description())).bold()
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "{:>8} {:>8} {:>8} {:>8} {}",
        style("CHANGES").bold(),
        style("ADDED").bold(),
        style("DELETED").bold(),
        style("COMMITS").bold(),
        style("FILEPATH").bold()
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for e in entries {
        writeln!(
            out,
            "{:>8} {:>8} {:>8} {:>8} {}",
            e.stat.changes, e.stat.additions, e.stat.deletions, e.stat.commits, e.path
        )?;
    }
    Ok(())
}
