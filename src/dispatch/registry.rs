use url::Url;

use crate::dispatch::strategy::Strategy;
use crate::error::ExtractionError;

/// Ordered set of strategies.
///
/// Specific strategies are tried in registration order and the first whose
/// `supports` matches wins; the fallback is consulted only after all of them.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    specific: Vec<Strategy>,
    fallback: Option<Strategy>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Naver Blog, Tistory, Brunch, Instagram, then the generic fallback.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(Strategy::naver_blog())
            .with(Strategy::tistory())
            .with(Strategy::brunch())
            .with(Strategy::instagram())
            .with_fallback(Strategy::generic())
    }

    /// Appends a platform-specific strategy after those already registered.
    pub fn with(mut self, strategy: Strategy) -> Self {
        self.specific.push(strategy);
        self
    }

    pub fn with_fallback(mut self, strategy: Strategy) -> Self {
        self.fallback = Some(strategy);
        self
    }

    pub fn select(&self, url: &Url) -> Result<&Strategy, ExtractionError> {
        self.iter()
            .find(|strategy| strategy.supports(url))
            .ok_or_else(|| ExtractionError::PlatformNotSupported(url.to_string()))
    }

    /// Strategies in dispatch order, fallback last.
    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.specific.iter().chain(self.fallback.iter())
    }

    pub fn specific(&self) -> &[Strategy] {
        &self.specific
    }

    pub fn is_empty(&self) -> bool {
        self.specific.is_empty() && self.fallback.is_none()
    }
}
