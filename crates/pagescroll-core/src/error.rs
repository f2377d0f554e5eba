use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Navigation attempted before `init()` or after `destroy()`
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Page index {index} out of range (page count: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
