pub mod builder;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod links;
pub mod model;
pub mod response;

use log::{error, info};
use url::Url;

pub use builder::CrawlerBuilder;
pub use config::{load_config, CrawlConfig};
pub use crawler::{CrawlReport, PageOutcome, PageVisit, RecipeCrawler};
pub use error::ScrapeError;
pub use model::RecipeRecord;
pub use response::{ScrapeRequest, ScrapeResponse};

use crate::extractors::{extract_with_fallback, ParsingContext};

/// Handle one scrape request with the default budgets.
///
/// Never fails: request faults come back as the `{ error }` shape and an
/// empty crawl as `{ recipes: [], message }`.
///
/// # Example
/// ```no_run
/// # use recipe_crawl::{scrape, ScrapeRequest};
/// # #[tokio::main]
/// # async fn main() {
/// let response = scrape(&ScrapeRequest::new("https://example.com/recipes/chili/")).await;
/// println!("{}", serde_json::to_string_pretty(&response).unwrap());
/// # }
/// ```
pub async fn scrape(request: &ScrapeRequest) -> ScrapeResponse {
    scrape_with_config(request, &CrawlConfig::default()).await
}

/// Handle one scrape request with explicit budgets and HTTP settings.
pub async fn scrape_with_config(request: &ScrapeRequest, config: &CrawlConfig) -> ScrapeResponse {
    let result = match RecipeCrawler::builder().config(config.clone()).build() {
        Ok(crawler) => run(&crawler, request).await,
        Err(e) => Err(e),
    };

    if let Err(ref e) = result {
        error!("Scrape request failed: {}", e);
    }
    ScrapeResponse::from(result)
}

/// Handle one scrape request with a caller-supplied crawler.
pub async fn scrape_with_crawler(crawler: &RecipeCrawler, request: &ScrapeRequest) -> ScrapeResponse {
    ScrapeResponse::from(run(crawler, request).await)
}

async fn run(
    crawler: &RecipeCrawler,
    request: &ScrapeRequest,
) -> Result<Vec<RecipeRecord>, ScrapeError> {
    let seed = request.seed_url()?;
    let mut recipes = crawler.crawl(&seed).await.recipes;

    if let Some(cookbook_id) = &request.cookbook_id {
        for recipe in &mut recipes {
            recipe.cookbook_id = Some(cookbook_id.clone());
        }
    }

    if recipes.is_empty() {
        info!("No recipes found starting from {}", seed);
    }
    Ok(recipes)
}

/// Extract recipes from already fetched HTML without crawling.
///
/// Structured data is tried first; the HTML class heuristics only run when
/// it yields nothing.
pub fn extract_recipes(html: &str, page_url: &Url) -> Vec<RecipeRecord> {
    let context = ParsingContext::new(page_url.clone(), html);
    extract_with_fallback(&context)
        .map(|(_, recipes)| recipes)
        .unwrap_or_default()
}
