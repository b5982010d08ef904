use super::PageFetcher;
use crate::config::CrawlConfig;
use crate::error::ScrapeError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

/// Plain HTTP(S) fetcher. One GET per URL, no retries.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for RequestFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
