pub mod documents;
pub mod image;
pub mod queries;
pub mod sanity;

use async_trait::async_trait;
use thiserror::Error;

use crate::app::Result;
use crate::domain::{ContentKind, ContentRecord};

pub use image::{ImageOptions, ImageUrlBuilder};
pub use sanity::SanityClient;

/// Failures talking to the content store. An empty collection is not one
/// of them: the store answering with no documents is a successful fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Content store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Content store is not configured (set SANITY_PROJECT_ID and SANITY_DATASET)")]
    NotConfigured,
}

#[async_trait]
pub trait ContentFetcher {
    /// Fetch every record of `kind`, in the order the store returns them.
    async fn fetch_collection(&self, kind: ContentKind) -> Result<Vec<ContentRecord>>;
}
