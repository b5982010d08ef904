use crate::builder::CrawlerBuilder;
use crate::config::CrawlConfig;
use crate::error::ScrapeError;
use crate::extractors::{extract_with_fallback, ParsingContext};
use crate::fetchers::{PageFetcher, RequestFetcher};
use crate::links::{discover_links, normalize_url};
use crate::model::{DedupKey, RecipeRecord};
use log::{info, warn};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrontierEntry {
    url: Url,
    depth: usize,
}

/// What happened to a dequeued page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum PageOutcome {
    /// Fetched; `strategy` names the extractor that produced recipes, if any
    Extracted {
        strategy: Option<&'static str>,
        recipes: usize,
    },
    FetchFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVisit {
    pub url: String,
    pub depth: usize,
    pub outcome: PageOutcome,
}

/// Result of one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub recipes: Vec<RecipeRecord>,
    pub pages_scraped: usize,
    /// Every page that was fetched, in crawl order
    pub pages: Vec<PageVisit>,
}

/// Per-request crawl bookkeeping. Built fresh for each crawl and dropped
/// when it ends.
#[derive(Debug, Default)]
pub(crate) struct CrawlState {
    visited: HashSet<String>,
    queued: HashSet<String>,
    frontier: VecDeque<FrontierEntry>,
    pages_scraped: usize,
    collected: Vec<RecipeRecord>,
    seen: HashSet<DedupKey>,
}

impl CrawlState {
    fn new(seed: &Url) -> Self {
        let mut state = Self::default();
        state.enqueue(normalize_url(seed), 0);
        state
    }

    /// Queue a URL unless it was already queued or visited.
    fn enqueue(&mut self, url: Url, depth: usize) -> bool {
        if self.visited.contains(url.as_str()) || !self.queued.insert(url.to_string()) {
            return false;
        }
        self.frontier.push_back(FrontierEntry { url, depth });
        true
    }

    /// Next unvisited entry, counted against the page budget.
    fn next_page(&mut self, max_pages: usize) -> Option<FrontierEntry> {
        while self.pages_scraped < max_pages {
            let entry = self.frontier.pop_front()?;
            if self.visited.insert(entry.url.to_string()) {
                self.pages_scraped += 1;
                return Some(entry);
            }
        }
        None
    }

    /// Append the recipes that are not duplicates of earlier ones; returns
    /// how many were kept.
    fn collect(&mut self, recipes: Vec<RecipeRecord>) -> usize {
        let before = self.collected.len();
        for recipe in recipes {
            if self.seen.insert(recipe.dedup_key()) {
                self.collected.push(recipe);
            }
        }
        self.collected.len() - before
    }

    fn pages_scraped(&self) -> usize {
        self.pages_scraped
    }

    fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}

pub struct RecipeCrawler {
    pub(crate) fetcher: Arc<dyn PageFetcher>,
    pub(crate) max_pages: usize,
    pub(crate) max_depth: usize,
    pub(crate) timeout: Duration,
}

impl RecipeCrawler {
    pub fn builder() -> CrawlerBuilder {
        CrawlerBuilder::default()
    }

    /// Crawler backed by [`RequestFetcher`] with the given budgets.
    pub fn new(config: &CrawlConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher: Arc::new(RequestFetcher::new(config)?),
            max_pages: config.max_pages,
            max_depth: config.max_depth,
            timeout: config.timeout(),
        })
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Per-request timeout of the default HTTP fetcher
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Breadth-first crawl from `seed`, staying on its host.
    ///
    /// A page that fails to fetch contributes nothing and the crawl moves
    /// on. Links are only queued while the frontier plus the pages already
    /// fetched are below the page budget.
    pub async fn crawl(&self, seed: &Url) -> CrawlReport {
        info!(
            "Crawling {} (max {} pages, depth {})",
            seed, self.max_pages, self.max_depth
        );
        let mut state = CrawlState::new(seed);
        let mut pages = Vec::new();

        while let Some(entry) = state.next_page(self.max_pages) {
            let html = match self.fetcher.fetch(&entry.url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Failed to fetch {}: {}", entry.url, e);
                    pages.push(PageVisit {
                        url: entry.url.to_string(),
                        depth: entry.depth,
                        outcome: PageOutcome::FetchFailed,
                    });
                    continue;
                }
            };

            let follow_links = entry.depth < self.max_depth;
            let (extracted, links) =
                process_page(&html, &entry.url, follow_links, &state.visited);

            let (strategy, kept) = match extracted {
                Some((strategy, recipes)) => (Some(strategy), state.collect(recipes)),
                None => (None, 0),
            };
            info!(
                "{}: {} new recipes{}",
                entry.url,
                kept,
                strategy.map(|s| format!(" via {s}")).unwrap_or_default()
            );

            for link in links {
                if state.frontier_len() + state.pages_scraped() >= self.max_pages {
                    break;
                }
                state.enqueue(link, entry.depth + 1);
            }

            pages.push(PageVisit {
                url: entry.url.to_string(),
                depth: entry.depth,
                outcome: PageOutcome::Extracted {
                    strategy,
                    recipes: kept,
                },
            });
        }

        info!(
            "Crawl of {} finished: {} recipes from {} pages",
            seed,
            state.collected.len(),
            state.pages_scraped
        );

        CrawlReport {
            recipes: state.collected,
            pages_scraped: state.pages_scraped,
            pages,
        }
    }
}

/// Parse once, extract, and discover links. Kept synchronous so the parsed
/// document never lives across an await point.
fn process_page(
    html: &str,
    url: &Url,
    follow_links: bool,
    visited: &HashSet<String>,
) -> (Option<(&'static str, Vec<RecipeRecord>)>, Vec<Url>) {
    let context = ParsingContext::new(url.clone(), html);
    let extracted = extract_with_fallback(&context);
    let links = if follow_links {
        discover_links(&context.document, url, visited)
    } else {
        Vec::new()
    };
    (extracted, links)
}
