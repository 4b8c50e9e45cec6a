//! URL classification, bounded execution and result caching.

pub mod cache;
pub mod dispatcher;
pub mod pool;
pub mod registry;
pub mod strategy;

pub use cache::{CacheKey, ResultCache};
pub use dispatcher::{ContentExtractor, ExtractionHandle, validate_url};
pub use pool::{TaskHandle, WorkerPool};
pub use registry::StrategyRegistry;
pub use strategy::{DocumentStrategy, JobStrategy, Platform, Strategy};
