use thiserror::Error;

pub type Result<T> = std::result::Result<T, HotfilesError>;

#[derive(Error, Debug)]
pub enum HotfilesError {
    #[error("Invalid exclude pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Invalid extension list: {0}")]
    InvalidExtension(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("git log failed ({status}): {stderr}")]
    GitCommand { status: String, stderr: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Manual From implementation for unboxed to boxed conversion
impl From<gix::discover::Error> for HotfilesError {
    fn from(err: gix::discover::Error) -> Self {
        HotfilesError::GitDiscover(Box::new(err))
    }
}
