use thiserror::Error;

/// Errors that can occur while scraping recipes
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The request carried no starting URL
    #[error("Missing required field: url")]
    MissingUrl,

    /// The starting URL could not be parsed as an absolute URL
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Only http and https pages can be crawled
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// Failed to fetch a page
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

impl ScrapeError {
    /// Whether the fault comes from the caller's input rather than the pipeline
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScrapeError::MissingUrl
                | ScrapeError::InvalidUrl { .. }
                | ScrapeError::UnsupportedScheme(_)
        )
    }
}
