pub mod repo;

pub use repo::{parse_date, GitRepo, LogQuery};
