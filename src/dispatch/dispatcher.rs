use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};
use url::Url;

use crate::config::Config;
use crate::dispatch::{
    cache::{CacheKey, ResultCache, canonical_url},
    pool::{TaskHandle, WorkerPool},
    registry::StrategyRegistry,
    strategy::Strategy,
};
use crate::error::ExtractionError;
use crate::extractor::ExtractionResult;
use crate::jobs::ScrapeJobClient;

pub type ExtractionHandle = TaskHandle<ExtractionResult>;

/// Rejects blank and non-http input before any I/O happens.
pub fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("http")) {
        return Err(ExtractionError::InvalidUrl(raw.to_string()));
    }

    let url = Url::parse(trimmed).map_err(|_| ExtractionError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ExtractionError::InvalidUrl(raw.to_string())),
    }
}

/// Entry point of the pipeline: classifies a URL, runs the matching strategy
/// on the pool for its execution shape and caches successful results.
///
/// Cheap to clone; clones share pools, cache and job client.
#[derive(Clone)]
pub struct ContentExtractor {
    registry: Arc<StrategyRegistry>,
    cache: Arc<ResultCache>,
    jobs: Arc<ScrapeJobClient>,
    fetch_pool: Arc<WorkerPool>,
    job_pool: Arc<WorkerPool>,
}

impl ContentExtractor {
    pub fn new(config: &Config) -> Result<Self, ExtractionError> {
        Self::with_registry(config, StrategyRegistry::with_defaults())
    }

    pub fn with_registry(
        config: &Config,
        registry: StrategyRegistry,
    ) -> Result<Self, ExtractionError> {
        Ok(Self {
            registry: Arc::new(registry),
            cache: Arc::new(ResultCache::new(&config.cache)),
            jobs: Arc::new(ScrapeJobClient::new(config.job.clone())?),
            fetch_pool: Arc::new(WorkerPool::new("extract", config.extract_pool.clone())),
            job_pool: Arc::new(WorkerPool::new("job", config.job_pool.clone())),
        })
    }

    /// Starts extracting `url` and returns a handle to the eventual result.
    ///
    /// Validation and classification failures, as well as cache hits, come
    /// back as an already settled handle.
    pub fn submit(&self, url: &str) -> ExtractionHandle {
        let (strategy, url) = match self.classify(url) {
            Ok(found) => found,
            Err(e) => {
                warn!(url, error = %e, "Rejected extraction request");
                return TaskHandle::Ready(Err(e));
            }
        };

        let key = CacheKey::for_request(&strategy, &url);
        if let Some(hit) = self.cache.get(&key) {
            info!(url = %url, platform = %strategy.platform(), "Serving cached extraction");
            return TaskHandle::Ready(Ok(hit));
        }

        let span = info_span!("extraction", url = %url, platform = %strategy.platform());
        info!(parent: &span, "Dispatching extraction");

        let cache = self.cache.clone();
        match strategy {
            Strategy::Document(document) => self.fetch_pool.submit(
                async move {
                    let (result, located) = document.run(&url).await?;
                    info!(images = result.image_urls.len(), "Extraction complete");
                    let resolved = CacheKey::Document(canonical_url(&located));
                    if resolved != key {
                        cache.insert(resolved, result.clone());
                    }
                    cache.insert(key, result.clone());
                    Ok(result)
                }
                .instrument(span),
            ),
            Strategy::ExternalJob(job) => {
                let jobs = self.jobs.clone();
                self.job_pool.submit(
                    async move {
                        let result = job.run(&jobs, &url).await?;
                        info!(images = result.image_urls.len(), "Extraction complete");
                        cache.insert(key, result.clone());
                        Ok(result)
                    }
                    .instrument(span),
                )
            }
        }
    }

    /// Submits `url` and waits for the outcome.
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractionError> {
        self.submit(url).join().await
    }

    fn classify(&self, raw: &str) -> Result<(Strategy, Url), ExtractionError> {
        let url = validate_url(raw)?;
        let strategy = *self.registry.select(&url)?;
        Ok((strategy, url))
    }

    /// Drains both pools; later submissions fail with `PoolShutdown`.
    pub async fn shutdown(&self) {
        tokio::join!(self.fetch_pool.shutdown(), self.job_pool.shutdown());
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.tistory.com/1").is_ok());
        assert!(validate_url("  HTTP://example.com  ").is_ok());

        for bad in ["", "   ", "ftp://example.com", "example.com", "http://", "httpfoo"] {
            assert!(
                matches!(validate_url(bad), Err(ExtractionError::InvalidUrl(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_blank_url_settles_immediately() {
        let extractor = ContentExtractor::new(&Config::default()).unwrap();
        let handle = extractor.submit("");
        assert!(handle.is_ready());
        assert!(matches!(
            handle.join().await,
            Err(ExtractionError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_registry_supports_nothing() {
        let extractor =
            ContentExtractor::with_registry(&Config::default(), StrategyRegistry::new()).unwrap();
        assert!(matches!(
            extractor.extract("https://example.com/").await,
            Err(ExtractionError::PlatformNotSupported(_))
        ));
    }

    #[tokio::test]
    async fn test_cached_result_served_without_io() {
        let extractor = ContentExtractor::new(&Config::default()).unwrap();
        let url = Url::parse("https://example.tistory.com/7").unwrap();
        let cached = ExtractionResult {
            text: "제목: 캐시".to_string(),
            image_urls: vec![],
        };
        extractor.cache().insert(
            CacheKey::for_request(&Strategy::tistory(), &url),
            cached.clone(),
        );

        let handle = extractor.submit("https://example.tistory.com/7#comments");
        assert!(handle.is_ready());
        assert_eq!(handle.join().await.unwrap(), cached);
    }
}
