//! Strategy registry — an explicitly constructed catalogue of strategies.
//!
//! Built once by the composition root and passed by reference. Listing order
//! is registration order.

use super::{
    BollingerReversion, Breakout, Composite, DualMaFilter, MaCrossover, Macd, RsiThreshold,
    Strategy, StrategyParams,
};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("strategy id already registered: {0}")]
    Duplicate(String),
}

#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in strategy.
    pub fn with_builtins() -> Self {
        let builtins: Vec<Box<dyn Strategy>> = vec![
            Box::new(MaCrossover),
            Box::new(RsiThreshold),
            Box::new(Breakout),
            Box::new(BollingerReversion),
            Box::new(DualMaFilter),
            Box::new(Macd),
            Box::new(Composite::default()),
        ];
        Self {
            strategies: builtins,
        }
    }

    pub fn register(&mut self, strategy: Box<dyn Strategy>) -> Result<(), RegistryError> {
        let id = strategy.info().id;
        if self.get(&id).is_some() {
            return Err(RegistryError::Duplicate(id));
        }
        self.strategies.push(strategy);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&dyn Strategy> {
        self.strategies
            .iter()
            .find(|s| s.info().id == id)
            .map(|s| &**s)
    }

    pub fn all(&self) -> impl Iterator<Item = &dyn Strategy> {
        self.strategies.iter().map(|s| &**s)
    }

    pub fn ids(&self) -> Vec<String> {
        self.all().map(|s| s.info().id).collect()
    }

    /// Schema defaults for `id`, or `None` for an unknown id.
    pub fn default_parameters(&self, id: &str) -> Option<StrategyParams> {
        self.get(id).map(|s| s.default_parameters())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}
