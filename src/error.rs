use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelError {
    /// Network failure, non-2xx status or an undecodable body. The UI does
    /// not distinguish between these.
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ReelError {
    fn from(err: reqwest::Error) -> Self {
        ReelError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReelError>;
