use thiserror::Error;

use crate::domain::ContentKind;
use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum ChapelError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("No {0} content available")]
    EmptyCollection(ContentKind),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl ChapelError {
    /// Whether this failure came from the content store rather than from
    /// the content itself.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ChapelError::Fetch(_))
    }
}

pub type Result<T> = std::result::Result<T, ChapelError>;
