use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{DefaultStrategy, ExtractionStrategy};

pub type StrategyBox = Arc<dyn ExtractionStrategy>;

/// Lower-case the source name and drop all whitespace.
/// "New Egg" → "newegg"
pub fn normalize_source_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Source name → strategy lookup. Read-only once built, so it can be
/// shared across concurrent runs without locking.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, StrategyBox>,
    fallback: StrategyBox,
}

impl StrategyRegistry {
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::default()
    }

    /// Registry with no source-specific strategies.
    pub fn with_defaults() -> Self {
        Self::builder().build()
    }

    /// Strategy for `source_name`, or the default when none is registered.
    pub fn dispatch(&self, source_name: &str) -> StrategyBox {
        let key = normalize_source_name(source_name);
        match self.strategies.get(&key) {
            Some(strategy) => {
                debug!("Using '{}' strategy for source '{}'", strategy.name(), source_name);
                Arc::clone(strategy)
            }
            None => Arc::clone(&self.fallback),
        }
    }

    pub fn has_strategy(&self, source_name: &str) -> bool {
        self.strategies.contains_key(&normalize_source_name(source_name))
    }

    pub fn registered_sources(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.strategies.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[derive(Default)]
pub struct StrategyRegistryBuilder {
    strategies: HashMap<String, StrategyBox>,
    fallback: Option<StrategyBox>,
}

impl StrategyRegistryBuilder {
    /// Register a strategy under the normalized form of `source_name`.
    /// A later registration for the same key replaces the earlier one.
    pub fn register(mut self, source_name: &str, strategy: StrategyBox) -> Self {
        self.strategies.insert(normalize_source_name(source_name), strategy);
        self
    }

    pub fn fallback(mut self, strategy: StrategyBox) -> Self {
        self.fallback = Some(strategy);
        self
    }

    pub fn build(self) -> StrategyRegistry {
        StrategyRegistry {
            strategies: self.strategies,
            fallback: self
                .fallback
                .unwrap_or_else(|| Arc::new(DefaultStrategy::new())),
        }
    }
}
