//! Discovery of recipe-looking links on a crawled page.

use log::debug;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Path fragments that usually mark a single recipe page
const RECIPE_PATH_HINTS: &[&str] = &[
    "/recipe/", "/recipes/", "/dish/", "/cook/", "/meal/", "/food/",
];

/// Blog permalinks such as /2023/10/14/spicy-chili/
static DATED_POST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\d{4}/\d{2}/\d{2}/[^/]+/?").expect("dated post pattern is valid")
});

/// Canonical form used for visited-set membership: fragment removed.
pub fn normalize_url(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

pub fn is_recipe_path(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    RECIPE_PATH_HINTS.iter().any(|hint| path.contains(hint)) || DATED_POST.is_match(&path)
}

/// Same-host, not yet visited, recipe-looking links of `document`, in
/// document order. Hrefs that don't resolve to an http(s) URL are dropped.
pub fn discover_links(document: &Html, page_url: &Url, visited: &HashSet<String>) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let host = page_url.host_str();

    let links: Vec<Url> = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .filter(|link| matches!(link.scheme(), "http" | "https"))
        .map(|link| normalize_url(&link))
        .filter(|link| link.host_str() == host)
        .filter(|link| !visited.contains(link.as_str()))
        .filter(is_recipe_path)
        .collect();

    debug!("Discovered {} candidate links on {}", links.len(), page_url);
    links
}
