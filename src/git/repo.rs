use crate::error::{HotfilesError, Result};
use crate::model::DateRange;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use gix::{discover, Repository};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Arguments for one `git log --numstat` run.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub max_commits: Option<usize>,
    pub range: DateRange,
    pub path: Option<String>,
}

impl LogQuery {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            "--pretty=format:%H".to_string(),
            "--numstat".to_string(),
        ];
        if let Some(n) = self.max_commits {
            args.push(format!("-n{n}"));
        }
        if let Some(since) = &self.range.since {
            args.push(format!("--since={since}"));
        }
        if let Some(until) = &self.range.until {
            args.push(format!("--until={until}"));
        }
        if let Some(path) = &self.path {
            args.push("--".to_string());
            args.push(path.clone());
        }
        args
    }
}

/// A `--since`/`--until` value as handed to git, plus our own reading of it when we have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBound {
    pub git_arg: String,
    pub approx: Option<DateTime<Utc>>,
}

pub struct GitRepo {
    repo: Repository,
    run_dir: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path`, or the current dir if `None`.
    /// git later runs in that same directory so relative pathspecs resolve like they do in a shell.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let run_dir = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&run_dir)?;
        debug!(
            event = "git.repo.opened",
            workdir = %repo.workdir().unwrap_or_else(|| repo.path()).display(),
            run_dir = %run_dir.display()
        );

        Ok(Self { repo, run_dir })
    }

    pub fn resolve_range(&self, since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
        let now = Utc::now();
        let since = since
            .map(|s| resolve_bound(s, now, |rev| self.revision_time(rev)))
            .transpose()?;
        let until = until
            .map(|u| resolve_bound(u, now, |rev| self.revision_time(rev)))
            .transpose()?;
        range_from_bounds(since, until)
    }

    fn revision_time(&self, input: &str) -> Option<DateTime<Utc>> {
        let id = self.repo.rev_parse_single(input).ok()?;
        let commit = id.object().ok()?.try_into_commit().ok()?;
        let secs = commit.time().ok()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
    }

    /// Runs `git log --numstat` in the directory the repository was opened from.
    pub fn numstat_log(&self, query: &LogQuery) -> Result<String> {
        let args = query.to_args();
        info!(event = "git.log.started", dir = %self.run_dir.display(), args = ?args);

        let output = Command::new("git").args(&args).current_dir(&self.run_dir).output()?;
        if !output.status.success() {
            return Err(HotfilesError::GitCommand {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(event = "git.log.completed", bytes = stdout.len());
        Ok(stdout)
    }
}

/// Dates git reads the same way we do are passed verbatim so git applies its own timezone and
/// calendar rules. Compact durations and revisions become an absolute time. Anything else is left
/// to git's approxidate.
pub fn resolve_bound<F>(input: &str, now: DateTime<Utc>, revision_time: F) -> Result<DateBound>
where
    F: FnOnce(&str) -> Option<DateTime<Utc>>,
{
    let input = input.trim();
    if input.is_empty() {
        return Err(HotfilesError::InvalidDate("empty date".to_string()));
    }

    if let Some(dt) = parse_date(input, now)? {
        return Ok(DateBound {
            git_arg: input.to_string(),
            approx: Some(dt),
        });
    }

    if let Some(duration) = parse_compact_duration(input) {
        let dt = subtract(now, duration, input)?;
        return Ok(DateBound {
            git_arg: git_date(dt),
            approx: Some(dt),
        });
    }

    if let Some(dt) = revision_time(input) {
        return Ok(DateBound {
            git_arg: git_date(dt),
            approx: Some(dt),
        });
    }

    debug!(event = "git.date.passthrough", input);
    Ok(DateBound {
        git_arg: input.to_string(),
        approx: None,
    })
}

/// Rejects `since` after `until` when both sides could be read.
pub fn range_from_bounds(since: Option<DateBound>, until: Option<DateBound>) -> Result<DateRange> {
    if let (Some(s), Some(u)) = (
        since.as_ref().and_then(|b| b.approx),
        until.as_ref().and_then(|b| b.approx),
    ) {
        if s > u {
            return Err(HotfilesError::InvalidDate(format!(
                "Invalid range: since ({}) is after until ({})",
                s, u
            )));
        }
    }

    let mut range = DateRange::new();
    if let Some(s) = since {
        range = range.with_since(s.git_arg);
    }
    if let Some(u) = until {
        range = range.with_until(u.git_arg);
    }
    Ok(range)
}

/// Parses absolute and relative dates. `Ok(None)` means "not a date we understand".
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
    let input = input.trim();

    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(Utc.from_utc_datetime(&datetime)));
        }
    }

    match input.to_lowercase().as_str() {
        "now" | "today" => return Ok(Some(now)),
        "yesterday" => return Ok(Some(now - ChronoDuration::days(1))),
        _ => {}
    }

    // Relative phrase (e.g., "2 weeks ago")
    if let Some(duration) = parse_natural_duration(input) {
        return subtract(now, duration, input).map(Some);
    }

    Ok(None)
}

/// git's own raw date format; unambiguous for approxidate.
fn git_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S +0000").to_string()
}

fn subtract(now: DateTime<Utc>, duration: Duration, input: &str) -> Result<DateTime<Utc>> {
    let target = SystemTime::from(now)
        .checked_sub(duration)
        .ok_or_else(|| HotfilesError::InvalidDate(format!("Duration overflow for '{input}'")))?;
    Ok(DateTime::<Utc>::from(target))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    for (unit, secs) in [("day", 86400), ("week", 7 * 86400), ("month", 30 * 86400), ("year", 365 * 86400)] {
        for suffix in [format!(" {unit}s ago"), format!(" {unit} ago")] {
            if let Some(n) = input.strip_suffix(suffix.as_str()) {
                if let Ok(n) = n.trim().parse::<u64>() {
                    return n.checked_mul(secs).map(Duration::from_secs);
                }
            }
        }
    }
    None
}

// "90d", "-2weeks"
fn parse_compact_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let compact = input.strip_prefix('-').unwrap_or(&input);
    humantime::parse_duration(compact).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn no_revisions(_: &str) -> Option<DateTime<Utc>> {
        None
    }

    #[test]
    fn parses_absolute_dates() {
        let day = parse_date("2023-01-01", now()).unwrap().unwrap();
        assert_eq!(day, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());

        let ts = parse_date("2023-06-01T10:00:00+02:00", now()).unwrap().unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_relative_dates() {
        assert_eq!(parse_date("yesterday", now()).unwrap(), Some(now() - ChronoDuration::days(1)));
        assert_eq!(parse_date("2 weeks ago", now()).unwrap(), Some(now() - ChronoDuration::days(14)));
        assert_eq!(parse_date("1 day ago", now()).unwrap(), Some(now() - ChronoDuration::days(1)));
    }

    #[test]
    fn unknown_input_is_left_for_revision_lookup() {
        assert_eq!(parse_date("HEAD~3", now()).unwrap(), None);
        assert_eq!(parse_date("v1.2.0", now()).unwrap(), None);
    }

    #[test]
    fn readable_dates_reach_git_verbatim() {
        let bound = resolve_bound(" 2023-01-01 ", now(), no_revisions).unwrap();
        assert_eq!(bound.git_arg, "2023-01-01");
        assert!(bound.approx.is_some());
    }

    #[test]
    fn compact_durations_become_absolute_times() {
        let bound = resolve_bound("-90d", now(), no_revisions).unwrap();
        assert_eq!(bound.approx, Some(now() - ChronoDuration::days(90)));
        assert_eq!(bound.git_arg, "2023-12-16 12:00:00 +0000");
        assert_eq!(parse_date("90d", now()).unwrap(), None);
    }

    #[test]
    fn git_only_phrases_pass_through() {
        for phrase in ["3 hours ago", "last week", "2.weeks.ago"] {
            let bound = resolve_bound(phrase, now(), no_revisions).unwrap();
            assert_eq!(bound, DateBound { git_arg: phrase.to_string(), approx: None });
        }
    }

    #[test]
    fn revisions_become_commit_times() {
        let at = Utc.with_ymd_and_hms(2022, 5, 4, 3, 2, 1).unwrap();
        let bound = resolve_bound("v1.0", now(), |rev| (rev == "v1.0").then_some(at)).unwrap();
        assert_eq!(bound.git_arg, "2022-05-04 03:02:01 +0000");
    }

    #[test]
    fn inverted_range_is_rejected_only_when_both_sides_are_known() {
        let since = resolve_bound("2024-02-01", now(), no_revisions).unwrap();
        let until = resolve_bound("2024-01-01", now(), no_revisions).unwrap();
        assert!(matches!(
            range_from_bounds(Some(since.clone()), Some(until)),
            Err(HotfilesError::InvalidDate(_))
        ));

        let vague = resolve_bound("last week", now(), no_revisions).unwrap();
        let range = range_from_bounds(Some(since), Some(vague)).unwrap();
        assert_eq!(range.until.as_deref(), Some("last week"));
        assert!(resolve_bound("  ", now(), no_revisions).is_err());
    }

    #[test]
    fn log_query_builds_git_arguments() {
        let query = LogQuery {
            max_commits: Some(25),
            range: DateRange::new().with_since("3 hours ago".to_string()),
            path: Some("*.rs".to_string()),
        };
        assert_eq!(
            query.to_args(),
            vec![
                "log",
                "--pretty=format:%H",
                "--numstat",
                "-n25",
                "--since=3 hours ago",
                "--",
                "*.rs",
            ]
        );
    }
}
