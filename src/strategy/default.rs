use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use scraper::ElementRef;
use tracing::debug;
use url::Url;

use crate::classifier::{KNOWN_MANUFACTURERS, classify, resolve_manufacturer};
use crate::extract::fields::{
    determine_in_stock, extract_attribute, extract_specifications, extract_text, parse_price,
};
use crate::extract::specs::derive_specs;
use crate::models::{Component, ComponentBase, DEFAULT_CURRENCY, EntityId, UNKNOWN};
use crate::strategy::{ExtractionContext, ExtractionStrategy};
use crate::utils::error::{AppError, Result};

pub const MAX_MODEL_LEN: usize = 30;

static MODEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[A-Z0-9]+-[A-Z0-9]+", // i7-9700K, RTX-3080
        r"[A-Z]+\s?[0-9]{4}",   // RTX 3080, RX6800
        r"[A-Z]{2,}[0-9]{3,}",  // GTX1080, RX580
    ]
    .iter()
    .map(|p| RegexBuilder::new(p).case_insensitive(true).build().unwrap())
    .collect()
});

/// Raw strings pulled from one product node.
#[derive(Debug, Default)]
struct ExtractedFields {
    name: String,
    price_text: String,
    model: String,
    image: String,
    description: String,
    manufacturer: String,
}

impl ExtractedFields {
    fn collect(ctx: &ExtractionContext<'_>, node: &ElementRef<'_>) -> Self {
        let selectors = ctx.selectors;
        let mut image = extract_attribute(node, selectors.image.as_ref(), "src");
        if image.is_empty() {
            image = extract_attribute(node, selectors.image.as_ref(), "data-src");
        }

        Self {
            name: extract_text(node, selectors.name.as_ref()),
            price_text: extract_text(node, selectors.price.as_ref()),
            model: extract_text(node, selectors.model.as_ref()),
            image,
            description: extract_text(node, selectors.description.as_ref()),
            manufacturer: extract_text(node, selectors.manufacturer.as_ref()),
        }
    }
}

/// The general-purpose strategy used for any source without its own.
#[derive(Debug, Default, Clone)]
pub struct DefaultStrategy;

impl DefaultStrategy {
    pub fn new() -> Self {
        Self
    }

    fn resolve_manufacturer_id(&self, ctx: &ExtractionContext<'_>, fields: &ExtractedFields) -> EntityId {
        if !fields.manufacturer.is_empty() {
            if let Some(id) = ctx.manufacturers.resolve(&fields.manufacturer) {
                return id;
            }
        }

        let guessed = resolve_manufacturer(&fields.name, &fields.description, KNOWN_MANUFACTURERS);
        if guessed != UNKNOWN && ctx.manufacturers.resolve(&guessed).is_none() {
            debug!("Manufacturer '{}' not in lookup, using Unknown", guessed);
        }
        ctx.manufacturers.resolve_or_unknown(&guessed)
    }
}

impl ExtractionStrategy for DefaultStrategy {
    fn name(&self) -> &str {
        "default"
    }

    fn extract_node(&self, ctx: &ExtractionContext<'_>, node: ElementRef<'_>) -> Result<Option<Component>> {
        let fields = ExtractedFields::collect(ctx, &node);

        if fields.name.is_empty() || fields.price_text.is_empty() {
            return Ok(None);
        }

        let classification = classify(&fields.name, &fields.description);
        let Some(category_id) = ctx.categories.resolve(classification.category) else {
            debug!(
                "No category '{}' in lookup for '{}'",
                classification.category, fields.name
            );
            return Ok(None);
        };

        let manufacturer_id = self.resolve_manufacturer_id(ctx, &fields);
        let image_url = resolve_image_url(ctx.page_url, &fields.image)?;

        let spec_text = if fields.description.is_empty() {
            fields.name.as_str()
        } else {
            fields.description.as_str()
        };
        let specs = derive_specs(classification.kind, spec_text);

        let model = if fields.model.is_empty() {
            model_from_name(&fields.name)
        } else {
            fields.model.clone()
        };

        let base = ComponentBase {
            model,
            price: parse_price(&fields.price_text),
            currency: DEFAULT_CURRENCY.to_string(),
            source_url: ctx.page_url.to_string(),
            image_url,
            description: (!fields.description.is_empty()).then(|| fields.description.clone()),
            in_stock: determine_in_stock(&node, ctx.selectors.in_stock.as_ref()),
            category_id,
            manufacturer_id,
            scraped_at: ctx.scraped_at,
            specifications: extract_specifications(&node, ctx.selectors.specification.as_ref()),
            name: fields.name,
        };

        Ok(Some(Component::new(base, specs)))
    }
}

/// Resolve a possibly-relative image reference against the page URL.
pub fn resolve_image_url(page_url: &str, raw: &str) -> Result<Option<String>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let base = Url::parse(page_url)
        .map_err(|e| AppError::extraction(format!("invalid page url '{}': {}", page_url, e)))?;
    let resolved = base
        .join(raw)
        .map_err(|e| AppError::extraction(format!("invalid image url '{}': {}", raw, e)))?;

    Ok(Some(resolved.to_string()))
}

/// Best-effort model code from a product name.
pub fn model_from_name(name: &str) -> String {
    MODEL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(name))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| name.chars().take(MAX_MODEL_LEN).collect())
}
