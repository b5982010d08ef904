use super::{Extractor, ParsingContext};
use crate::model::{generate_id, RecipeRecord, UNTITLED_RECIPE};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

pub struct HtmlClassExtractor;

/// One way of locating a value in the page.
enum Lookup {
    /// Text content of a matching element
    Text(&'static str),
    /// First non-empty attribute, in order, of a matching element
    Attr(&'static str, &'static [&'static str]),
}

use Lookup::{Attr, Text};

const IMAGE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

// Recipe card plugins first (WPRM, Tasty, Mediavine Create, WP Zoom), then
// generic theme markup.
const TITLE: &[Lookup] = &[
    Text(".wprm-recipe-name"),
    Text(".tasty-recipes-title"),
    Text(".mv-create-title"),
    Text(".wpzoom-recipe-card-title"),
    Text(".recipe-card-title"),
    Text(".recipe-title"),
    Text(".recipe-name"),
    Text("h1"),
    Attr("meta[property='og:title']", &["content"]),
];

const INGREDIENT_CONTAINERS: &[&str] = &[
    ".wprm-recipe-ingredients",
    ".wprm-recipe-ingredients-container",
    ".tasty-recipes-ingredients",
    ".mv-create-ingredients",
    ".wpzoom-recipe-ingredients",
    ".recipe-card-ingredients",
    ".recipe-ingredients",
    ".structured-ingredients",
    ".ingredients",
];

const INSTRUCTION_CONTAINERS: &[&str] = &[
    ".wprm-recipe-instructions",
    ".wprm-recipe-instructions-container",
    ".tasty-recipes-instructions",
    ".mv-create-instructions",
    ".wpzoom-recipe-instructions",
    ".recipe-card-instructions",
    ".recipe-instructions",
    ".recipe-directions",
    ".instructions",
    ".directions",
];

const IMAGE: &[Lookup] = &[
    Attr(".wprm-recipe-image img", IMAGE_ATTRS),
    Attr(".tasty-recipes-image img", IMAGE_ATTRS),
    Attr("img.mv-create-image", IMAGE_ATTRS),
    Attr(".recipe-card-image img", IMAGE_ATTRS),
    Attr(".recipe-image img", IMAGE_ATTRS),
    Attr("meta[property='og:image']", &["content"]),
];

const COOK_TIME: &[Lookup] = &[
    Text(".wprm-recipe-cook_time"),
    Text(".wprm-recipe-cook-time"),
    Text(".tasty-recipes-cook-time"),
    Text(".mv-create-time-active"),
    Text(".recipe-cook-time"),
    Text(".wprm-recipe-total_time"),
    Text(".wprm-recipe-total-time"),
    Text(".tasty-recipes-total-time"),
    Text(".mv-create-time-total"),
    Text(".recipe-total-time"),
];

const SERVINGS: &[Lookup] = &[
    Text(".wprm-recipe-servings"),
    Text(".tasty-recipes-yield"),
    Text(".mv-create-yield"),
    Text(".recipe-servings"),
    Text(".recipe-yield"),
];

const MEAL_TYPE: &[Lookup] = &[
    Text(".wprm-recipe-course"),
    Text(".tasty-recipes-category"),
    Text(".mv-create-category"),
    Text(".recipe-category"),
];

fn element_text(element: &ElementRef) -> String {
    let text = element.text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Lookup {
    fn selector(&self) -> &'static str {
        match self {
            Text(selector) | Attr(selector, _) => *selector,
        }
    }

    fn find(&self, document: &Html) -> Option<String> {
        let (selector_str, attrs) = match self {
            Text(selector) => (*selector, None),
            Attr(selector, attrs) => (*selector, Some(*attrs)),
        };
        let selector = Selector::parse(selector_str).ok()?;

        document.select(&selector).find_map(|element| {
            let value = match attrs {
                None => element_text(&element),
                Some(attrs) => attrs
                    .iter()
                    .filter_map(|attr| element.value().attr(attr))
                    .map(str::trim)
                    .find(|value| !value.is_empty())?
                    .to_string(),
            };
            (!value.is_empty()).then_some(value)
        })
    }
}

/// First lookup that yields a value wins.
fn first_match(document: &Html, lookups: &[Lookup], field: &str) -> Option<String> {
    lookups.iter().find_map(|lookup| {
        let value = lookup.find(document)?;
        debug!("HtmlClassExtractor: Found {} via {}", field, lookup.selector());
        Some(value)
    })
}

/// Top-level `li` items of a container. Items of a nested sub-list are
/// already part of their parent item's text.
fn top_level_items(container: &ElementRef, li_selector: &Selector) -> Vec<String> {
    container
        .select(li_selector)
        .filter(|li| {
            !li.ancestors()
                .take_while(|node| node.id() != container.id())
                .filter_map(ElementRef::wrap)
                .any(|ancestor| ancestor.value().name() == "li")
        })
        .map(|li| element_text(&li))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Direct children with the given tag name, for themes that don't use lists.
fn child_items(container: &ElementRef, tag: &str) -> Vec<String> {
    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == tag)
        .map(|child| element_text(&child))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Items of the first container class that yields any. Every element
/// matching that class contributes, so grouped ingredient lists are kept
/// together. A match nested inside another match is skipped.
fn extract_list_items(document: &Html, containers: &[&str], field: &str) -> Vec<String> {
    let Ok(li_selector) = Selector::parse("li") else {
        return Vec::new();
    };

    for class_selector in containers {
        let Ok(selector) = Selector::parse(class_selector) else {
            continue;
        };

        let mut items = Vec::new();
        for container in document.select(&selector) {
            let nested = container
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| selector.matches(&ancestor));
            if nested {
                continue;
            }

            let mut found = top_level_items(&container, &li_selector);
            for tag in ["p", "div"] {
                if !found.is_empty() {
                    break;
                }
                found = child_items(&container, tag);
            }

            items.extend(found);
        }

        if !items.is_empty() {
            debug!(
                "HtmlClassExtractor: Found {} {} using {}",
                items.len(),
                field,
                class_selector
            );
            return items;
        }
    }

    Vec::new()
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "html_class"
    }

    fn extract(&self, context: &ParsingContext) -> Vec<RecipeRecord> {
        debug!("Attempting to extract recipe using HTML class matchers");
        let document = &context.document;

        let ingredients = extract_list_items(document, INGREDIENT_CONTAINERS, "ingredients");
        let instructions = extract_list_items(document, INSTRUCTION_CONTAINERS, "instructions");

        if ingredients.is_empty() && instructions.is_empty() {
            debug!("HtmlClassExtractor: No ingredient or instruction container found");
            return Vec::new();
        }

        let title = first_match(document, TITLE, "title")
            .unwrap_or_else(|| UNTITLED_RECIPE.to_string());

        let image = first_match(document, IMAGE, "image").and_then(|src| context.resolve(&src));

        debug!("Recipe name: {}", title);
        debug!("Ingredients count: {}", ingredients.len());
        debug!("Instructions count: {}", instructions.len());

        vec![RecipeRecord {
            id: generate_id(context.url.as_str(), &title, 0),
            title,
            ingredients,
            instructions,
            url: context.url.to_string(),
            image,
            cook_time: first_match(document, COOK_TIME, "cook_time"),
            servings: first_match(document, SERVINGS, "servings").map(Value::String),
            meal_type: first_match(document, MEAL_TYPE, "meal_type"),
            cookbook_id: None,
        }]
    }
}
