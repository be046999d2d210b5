pub mod default;
pub mod registry;

pub use default::DefaultStrategy;
pub use registry::{StrategyRegistry, StrategyRegistryBuilder, normalize_source_name};

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::models::{CategoryLookup, Component, ManufacturerLookup};
use crate::selectors::CompiledSelectors;
use crate::utils::error::Result;

/// Everything a strategy reads while turning one document into components.
pub struct ExtractionContext<'a> {
    pub document: &'a Html,
    pub page_url: &'a str,
    pub selectors: &'a CompiledSelectors,
    pub categories: &'a CategoryLookup,
    pub manufacturers: &'a ManufacturerLookup,
    pub scraped_at: DateTime<Utc>,
}

/// Per-document extraction tally.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub components: Vec<Component>,
    pub nodes_seen: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Turns a parsed document into typed components for one source.
///
/// Implementors supply [`ExtractionStrategy::extract_node`]; the provided
/// [`ExtractionStrategy::extract`] walks the product list and keeps going
/// past any node that errors.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` drops the node without counting it as a failure.
    fn extract_node(&self, ctx: &ExtractionContext<'_>, node: ElementRef<'_>) -> Result<Option<Component>>;

    fn product_nodes<'d>(&self, ctx: &ExtractionContext<'d>) -> Vec<ElementRef<'d>> {
        match ctx.selectors.product_list.as_ref() {
            Some(selector) => ctx.document.select(selector).collect(),
            None => Vec::new(),
        }
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> ExtractionOutcome {
        let mut outcome = ExtractionOutcome::default();

        for (index, node) in self.product_nodes(ctx).into_iter().enumerate() {
            outcome.nodes_seen += 1;
            match self.extract_node(ctx, node) {
                Ok(Some(component)) => outcome.components.push(component),
                Ok(None) => {
                    outcome.skipped += 1;
                    debug!("{}: product node {} skipped", self.name(), index);
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!("{}: error processing product node {}: {}", self.name(), index, e);
                }
            }
        }

        outcome
    }
}
