use crate::model::RecipeRecord;
use scraper::Html;
use url::Url;

mod html_class;
mod json_ld;

pub use html_class::HtmlClassExtractor;
pub use json_ld::JsonLdExtractor;

pub struct ParsingContext {
    pub url: Url,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// Resolve a possibly relative reference against the page URL.
    pub(crate) fn resolve(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        self.url.join(reference).ok().map(String::from)
    }
}

pub trait Extractor {
    /// Short name used in logs and crawl reports
    fn name(&self) -> &'static str;

    /// Every recipe found on the page. Records without ingredients and
    /// without instructions are never returned.
    fn extract(&self, context: &ParsingContext) -> Vec<RecipeRecord>;
}

/// Run the extractor chain: the first extractor that finds anything wins and
/// later ones are not consulted.
pub fn extract_with_fallback(context: &ParsingContext) -> Option<(&'static str, Vec<RecipeRecord>)> {
    let extractors: [&dyn Extractor; 2] = [&JsonLdExtractor, &HtmlClassExtractor];

    for extractor in extractors {
        let recipes = extractor.extract(context);
        if !recipes.is_empty() {
            return Some((extractor.name(), recipes));
        }
    }

    None
}
