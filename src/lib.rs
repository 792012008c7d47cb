pub mod aggregate;
pub mod churn;
pub mod cli;
pub mod error;
pub mod filter;
pub mod git;
pub mod logging;
pub mod model;
pub mod numstat;
pub mod options;
pub mod output;

pub use aggregate::{aggregate_lines, Aggregator, ChurnTable};
pub use error::{HotfilesError, Result};
pub use filter::PathFilter;
pub use model::{ChurnEntry, FileStat, SortKey};
