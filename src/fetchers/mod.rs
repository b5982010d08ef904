use crate::error::ScrapeError;
use async_trait::async_trait;
use url::Url;

mod request;

pub use request::RequestFetcher;

/// Source of page HTML for the crawler
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of `url` when the server answers with a success status.
    async fn fetch(&self, url: &Url) -> Result<String, ScrapeError>;
}
