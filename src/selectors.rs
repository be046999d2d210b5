use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, Result};

/// Where each field lives in one source's markup.
///
/// Deserialized from the source's stored JSON blob. Unknown keys are
/// ignored and a missing or blank key means the field is not extracted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectorConfig {
    #[serde(default)]
    pub product_list_selector: Option<String>,
    #[serde(default)]
    pub name_selector: Option<String>,
    #[serde(default)]
    pub price_selector: Option<String>,
    #[serde(default)]
    pub model_selector: Option<String>,
    #[serde(default)]
    pub image_selector: Option<String>,
    #[serde(default)]
    pub description_selector: Option<String>,
    #[serde(default)]
    pub specification_selector: Option<String>,
    #[serde(default)]
    pub manufacturer_selector: Option<String>,
    #[serde(default)]
    pub in_stock_selector: Option<String>,
}

/// Selectors parsed once per run.
#[derive(Debug, Clone, Default)]
pub struct CompiledSelectors {
    pub product_list: Option<Selector>,
    pub name: Option<Selector>,
    pub price: Option<Selector>,
    pub model: Option<Selector>,
    pub image: Option<Selector>,
    pub description: Option<Selector>,
    pub specification: Option<Selector>,
    pub manufacturer: Option<Selector>,
    pub in_stock: Option<Selector>,
}

impl SelectorConfig {
    pub fn from_blob(blob: Option<&str>) -> Result<Self> {
        let blob = blob
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| AppError::configuration("source has no selector configuration"))?;

        serde_json::from_str(blob)
            .map_err(|e| AppError::configuration(format!("invalid selector configuration: {}", e)))
    }

    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            product_list: compile_one("productListSelector", &self.product_list_selector)?,
            name: compile_one("nameSelector", &self.name_selector)?,
            price: compile_one("priceSelector", &self.price_selector)?,
            model: compile_one("modelSelector", &self.model_selector)?,
            image: compile_one("imageSelector", &self.image_selector)?,
            description: compile_one("descriptionSelector", &self.description_selector)?,
            specification: compile_one("specificationSelector", &self.specification_selector)?,
            manufacturer: compile_one("manufacturerSelector", &self.manufacturer_selector)?,
            in_stock: compile_one("inStockSelector", &self.in_stock_selector)?,
        })
    }
}

fn compile_one(key: &str, raw: &Option<String>) -> Result<Option<Selector>> {
    let Some(raw) = raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    Selector::parse(raw)
        .map(Some)
        .map_err(|e| AppError::configuration(format!("invalid CSS in {} '{}': {:?}", key, raw, e)))
}
