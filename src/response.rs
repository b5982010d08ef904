use crate::error::ScrapeError;
use crate::model::RecipeRecord;
use serde::{Deserialize, Serialize};
use url::Url;

pub const NO_RECIPES_MESSAGE: &str =
    "No structured recipe data found. Try a different URL or enter the recipe manually.";

/// Incoming scrape request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Cookbook the caller files the recipes under; copied onto each record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookbook_id: Option<String>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            cookbook_id: None,
        }
    }

    /// The starting URL, checked to be an absolute http(s) URL
    pub fn seed_url(&self) -> Result<Url, ScrapeError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ScrapeError::MissingUrl)?;

        let url = Url::parse(raw).map_err(|source| ScrapeError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ScrapeError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Outgoing response, one of three shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeResponse {
    /// Nothing found; a normal outcome, not a fault
    Empty {
        recipes: Vec<RecipeRecord>,
        message: String,
    },
    /// At least one recipe was found
    Recipes { recipes: Vec<RecipeRecord> },
    /// The request could not be processed at all
    Error {
        error: String,
        #[serde(skip)]
        status: u16,
    },
}

impl ScrapeResponse {
    pub fn from_recipes(recipes: Vec<RecipeRecord>) -> Self {
        if recipes.is_empty() {
            ScrapeResponse::Empty {
                recipes,
                message: NO_RECIPES_MESSAGE.to_string(),
            }
        } else {
            ScrapeResponse::Recipes { recipes }
        }
    }

    pub fn from_error(error: &ScrapeError) -> Self {
        ScrapeResponse::Error {
            error: error.to_string(),
            status: if error.is_client_error() { 400 } else { 500 },
        }
    }

    /// HTTP status a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ScrapeResponse::Recipes { .. } | ScrapeResponse::Empty { .. } => 200,
            ScrapeResponse::Error { status, .. } if *status != 0 => *status,
            ScrapeResponse::Error { .. } => 500,
        }
    }

    pub fn recipes(&self) -> &[RecipeRecord] {
        match self {
            ScrapeResponse::Recipes { recipes } | ScrapeResponse::Empty { recipes, .. } => {
                recipes.as_slice()
            }
            ScrapeResponse::Error { .. } => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ScrapeResponse::Error { .. })
    }
}

impl From<Result<Vec<RecipeRecord>, ScrapeError>> for ScrapeResponse {
    fn from(result: Result<Vec<RecipeRecord>, ScrapeError>) -> Self {
        match result {
            Ok(recipes) => ScrapeResponse::from_recipes(recipes),
            Err(e) => ScrapeResponse::from_error(&e),
        }
    }
}
