use super::{Extractor, ParsingContext};
use crate::model::{generate_id, RecipeRecord, UNTITLED_RECIPE};
use html_escape::decode_html_entities;
use log::{debug, warn};
use scraper::Selector;
use serde_json::Value;

pub struct JsonLdExtractor;

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn extract(&self, context: &ParsingContext) -> Vec<RecipeRecord> {
        debug!("JsonLdExtractor: Starting extraction for URL: {}", context.url);
        let Ok(selector) = Selector::parse("script[type^='application/ld+json' i]") else {
            return Vec::new();
        };

        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        let mut recipes = Vec::new();
        let mut ordinal = 0;

        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.text().collect::<String>();
            if raw_json.trim().is_empty() {
                debug!("JsonLdExtractor: Script {} is empty", index);
                continue;
            }

            let json_ld = match parse_block(&raw_json) {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        "Skipping malformed JSON-LD block {} on {}: {}",
                        index, context.url, e
                    );
                    continue;
                }
            };

            let mut nodes = Vec::new();
            collect_recipe_nodes(&json_ld, &mut nodes);
            debug!(
                "JsonLdExtractor: Script {} holds {} Recipe nodes",
                index,
                nodes.len()
            );

            for node in nodes {
                let recipe = convert_to_record(node, context, ordinal);
                ordinal += 1;
                if recipe.has_content() {
                    recipes.push(recipe);
                } else {
                    debug!(
                        "JsonLdExtractor: Dropping '{}' with no ingredients or instructions",
                        recipe.title
                    );
                }
            }
        }

        recipes
    }
}

/// Parse one script block, retrying once on a repaired copy.
fn parse_block(raw_json: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str::<Value>(raw_json) {
        Ok(value) => Ok(value),
        Err(strict_error) => {
            let repaired = repair_json(raw_json);
            debug!("JsonLdExtractor: Retrying with repaired JSON: {}", repaired);
            serde_json::from_str::<Value>(&repaired).map_err(|_| strict_error)
        }
    }
}

/// Strip comment/CDATA wrappers and trailing commas that some CMSes emit.
fn repair_json(json_str: &str) -> String {
    let mut body = json_str.trim();
    for prefix in ["<!--", "//<![CDATA[", "<![CDATA["] {
        body = body.strip_prefix(prefix).unwrap_or(body).trim();
    }
    for suffix in ["-->", "//]]>", "]]>"] {
        body = body.strip_suffix(suffix).unwrap_or(body).trim();
    }

    let chars: Vec<char> = body.chars().collect();
    let mut cleaned = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            cleaned.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                cleaned.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    cleaned.push(c);
                }
            }
            _ => cleaned.push(c),
        }
    }

    cleaned
}

/// Walk the whole tree and gather every node typed as a Recipe, wherever it
/// sits: top level, inside `@graph`, under `mainEntity`, or in a list.
fn collect_recipe_nodes<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_recipe_nodes(item, out);
            }
        }
        Value::Object(map) => {
            if is_recipe_type(value) {
                out.push(value);
            }
            for child in map.values() {
                collect_recipe_nodes(child, out);
            }
        }
        _ => {}
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_matches(type_str),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(type_matches),
        _ => false,
    }
}

fn type_matches(type_str: &str) -> bool {
    // "Recipe", "recipe", "http://schema.org/Recipe", "schema:Recipe"
    type_str
        .rsplit(['/', ':', '#'])
        .next()
        .is_some_and(|name| name.trim().eq_ignore_ascii_case("recipe"))
}

fn convert_to_record(node: &Value, context: &ParsingContext, ordinal: usize) -> RecipeRecord {
    let title = node
        .get("name")
        .and_then(Value::as_str)
        .map(decode_html_symbols)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string());

    let ingredients = match node
        .get("recipeIngredient")
        .or_else(|| node.get("ingredients"))
    {
        Some(Value::Array(items)) => items.iter().filter_map(ingredient_line).collect(),
        _ => Vec::new(),
    };

    let mut instructions = Vec::new();
    if let Some(value) = node.get("recipeInstructions") {
        collect_steps(value, &mut instructions);
    }

    let id = node
        .get("@id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .unwrap_or_else(|| generate_id(context.url.as_str(), &title, ordinal));

    let url = node
        .get("url")
        .and_then(Value::as_str)
        .and_then(|url| context.resolve(url))
        .unwrap_or_else(|| context.url.to_string());

    let cook_time = non_empty_str(node.get("cookTime"))
        .or_else(|| non_empty_str(node.get("totalTime")));

    let servings = node
        .get("recipeYield")
        .filter(|value| !value.is_null())
        .cloned();

    let meal_type = match node.get("recipeCategory") {
        Some(Value::String(category)) => Some(category.trim().to_string()),
        Some(Value::Array(categories)) => Some(
            categories
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
    .filter(|category| !category.is_empty());

    RecipeRecord {
        id,
        title,
        ingredients,
        instructions,
        url,
        image: node.get("image").and_then(|img| first_image(img, context)),
        cook_time,
        servings,
        meal_type,
        cookbook_id: None,
    }
}

fn ingredient_line(value: &Value) -> Option<String> {
    let line = match value {
        Value::String(s) => decode_html_symbols(s),
        // { "name": "flour", "amount": "2 cups" }
        Value::Object(obj) => {
            let name = decode_html_symbols(obj.get("name")?.as_str()?);
            match obj.get("amount").and_then(Value::as_str).map(str::trim) {
                Some(amount) if !amount.is_empty() => format!("{amount} {}", name.trim()),
                _ => name,
            }
        }
        _ => return None,
    };

    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}

/// Flatten any instruction encoding into plain steps: a string, a list of
/// strings, HowToStep objects, or HowToSections wrapping more steps.
fn collect_steps(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            out.extend(
                decode_html_symbols(text)
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from),
            );
        }
        Value::Array(items) => {
            for item in items {
                collect_steps(item, out);
            }
        }
        Value::Object(obj) => {
            if let Some(section) = obj.get("itemListElement") {
                collect_steps(section, out);
            } else if let Some(text) = obj
                .get("text")
                .and_then(Value::as_str)
                .or_else(|| obj.get("name").and_then(Value::as_str))
            {
                let step = decode_html_symbols(text);
                let step = step.trim();
                if !step.is_empty() {
                    out.push(step.to_string());
                }
            }
        }
        _ => {}
    }
}

/// First usable image from a URL string, an ImageObject, or a list of either.
fn first_image(value: &Value, context: &ParsingContext) -> Option<String> {
    match value {
        Value::String(url) => context.resolve(&decode_html_symbols(url)),
        Value::Object(obj) => obj
            .get("url")
            .or_else(|| obj.get("contentUrl"))
            .and_then(|url| first_image(url, context)),
        Value::Array(images) => images.iter().find_map(|img| first_image(img, context)),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text)).into_owned()
}
