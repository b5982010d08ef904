use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CrawlConfig;
use crate::crawler::RecipeCrawler;
use crate::error::ScrapeError;
use crate::fetchers::{PageFetcher, RequestFetcher};

/// Builder for configuring a [`RecipeCrawler`]
#[derive(Default)]
pub struct CrawlerBuilder {
    config: Option<CrawlConfig>,
    max_pages: Option<usize>,
    max_depth: Option<usize>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    fetcher: Option<Arc<dyn PageFetcher>>,
}

impl fmt::Debug for CrawlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlerBuilder")
            .field("config", &self.config)
            .field("max_pages", &self.max_pages)
            .field("max_depth", &self.max_depth)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("custom_fetcher", &self.fetcher.is_some())
            .finish()
    }
}

impl CrawlerBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// Explicit builder settings still take precedence over it.
    pub fn config(mut self, config: CrawlConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the maximum number of pages fetched per crawl
    ///
    /// # Example
    /// ```
    /// use recipe_crawl::RecipeCrawler;
    ///
    /// let builder = RecipeCrawler::builder().max_pages(10);
    /// ```
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Set how many links away from the seed page the crawl may go
    ///
    /// `0` fetches the seed page only.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_crawl::RecipeCrawler;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeCrawler::builder().timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom page source instead of HTTP
    pub fn fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Build the crawler
    ///
    /// # Errors
    /// Returns `ScrapeError::BuilderError` if the page budget is zero, or
    /// `ScrapeError::FetchError` if the HTTP client cannot be created.
    pub fn build(self) -> Result<RecipeCrawler, ScrapeError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout.as_secs();
        }
        config.timeout_secs = config.timeout_secs.max(1);
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        if config.max_pages == 0 {
            return Err(ScrapeError::BuilderError(
                "max_pages must be at least 1".to_string(),
            ));
        }

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(RequestFetcher::new(&config)?),
        };

        Ok(RecipeCrawler {
            fetcher,
            max_pages: config.max_pages,
            max_depth: config.max_depth,
            timeout: config.timeout(),
        })
    }
}
