use serde::{Deserialize, Serialize};

use crate::models::EntityId;

/// One marketplace configured for scraping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapingSource {
    pub id: EntityId,
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,

    // Selector configuration blob (JSON)
    #[serde(default)]
    pub scrape_configuration: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl ScrapingSource {
    pub fn new(id: EntityId, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base_url: base_url.into(),
            logo_url: None,
            is_enabled: true,
            scrape_configuration: None,
        }
    }

    pub fn with_configuration(mut self, blob: impl Into<String>) -> Self {
        self.scrape_configuration = Some(blob.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }
}
