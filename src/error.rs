use thiserror::Error;

use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid url: {0:?}")]
    InvalidUrl(String),

    #[error("no strategy supports url: {0}")]
    PlatformNotSupported(String),

    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    #[error("crawling failed for {url}: {reason}")]
    CrawlingFailed { url: String, reason: String },

    #[error("scrape job response carried no dataset id")]
    DatasetNotFound,

    #[error("scraped item has no caption")]
    ContentEmpty,

    #[error("scraped item has no images")]
    ImageNotFound,

    #[error("scraping api connection failed: {0}")]
    ApiConnectionFailed(String),

    #[error("dataset {dataset_id} not ready after {attempts} polls")]
    PollTimeout { dataset_id: String, attempts: u32 },

    #[error("worker pool is shut down")]
    PoolShutdown,

    #[error("worker task failed: {0}")]
    WorkerFailed(String),
}

impl ExtractionError {
    /// Stable, machine-readable tag for logs and callers that switch on kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::PlatformNotSupported(_) => "platform_not_supported",
            Self::FetchFailed(_) => "fetch_failed",
            Self::CrawlingFailed { .. } => "crawling_failed",
            Self::DatasetNotFound => "dataset_not_found",
            Self::ContentEmpty => "content_empty",
            Self::ImageNotFound => "image_not_found",
            Self::ApiConnectionFailed(_) => "api_connection_failed",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::PoolShutdown => "pool_shutdown",
            Self::WorkerFailed(_) => "worker_failed",
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// Nothing in this crate retries; this only informs the caller's policy.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::FetchFailed(err) => err.should_retry(),
            Self::ApiConnectionFailed(_) | Self::PollTimeout { .. } | Self::WorkerFailed(_) => {
                true
            }
            Self::InvalidUrl(_)
            | Self::PlatformNotSupported(_)
            | Self::CrawlingFailed { .. }
            | Self::DatasetNotFound
            | Self::ContentEmpty
            | Self::ImageNotFound
            | Self::PoolShutdown => false,
        }
    }
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        Self::ApiConnectionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(ExtractionError::InvalidUrl(String::new()).kind(), "invalid_url");
        assert_eq!(ExtractionError::DatasetNotFound.kind(), "dataset_not_found");
        assert_eq!(
            ExtractionError::FetchFailed(FetchError::RequestTimeout).kind(),
            "fetch_failed"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(ExtractionError::FetchFailed(FetchError::ConnectTimeout).is_transient());
        assert!(!ExtractionError::FetchFailed(FetchError::BodyTooLarge(1)).is_transient());
        assert!(ExtractionError::ApiConnectionFailed("reset".into()).is_transient());
        assert!(!ExtractionError::ContentEmpty.is_transient());
        assert!(
            !ExtractionError::CrawlingFailed {
                url: "https://a.tistory.com/1".into(),
                reason: "empty".into()
            }
            .is_transient()
        );
    }
}
