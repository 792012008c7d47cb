use crate::model::{OutputFormat, SortKey};
use crate::options::ChurnOptions;
use anyhow::Result;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hotfiles")]
#[command(about = "Find the most modified files in a Git repository")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub filters: FilterArgs,

    #[arg(short, long, value_enum, default_value_t = SortKey::Changes, help = "Sort by total changes, additions, deletions or commit count")]
    pub sort: SortKey,

    #[arg(short, long, default_value_t = 10, help = "Number of top files to display")]
    pub top: usize,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, help = "Output format")]
    pub format: OutputFormat,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(
        long,
        conflicts_with_all = ["repo", "commits", "since", "until"],
        help = "Read `git log --pretty=format:%H --numstat` output from a file ('-' for stdin)"
    )]
    pub input: Option<PathBuf>,

    #[arg(short = 'n', long, help = "Number of commits to analyze from the git log")]
    pub commits: Option<usize>,

    #[arg(long, help = "Start date (RFC3339, YYYY-MM-DD, '2 weeks ago', or a commit)")]
    pub since: Option<String>,

    #[arg(long, help = "End date (RFC3339, YYYY-MM-DD, 'yesterday', or a commit)")]
    pub until: Option<String>,

    #[arg(short, long, help = "Show detailed progress information")]
    pub verbose: bool,
}

#[derive(Args, Clone, Debug)]
pub struct FilterArgs {
    #[arg(short, long, help = "Only analyze files within specified path")]
    pub path: Option<String>,

    #[arg(short, long, help = "Exclude files matching this regex pattern")]
    pub exclude: Option<String>,

    #[arg(long, help = "Only include files with these extensions (comma-separated, e.g. 'h,hpp,c,cpp')")]
    pub ext: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let opts = ChurnOptions::from_args(&self.common, &self.filters, self.sort, self.top, self.format)?;
        crate::churn::exec(&opts)
    }
}
