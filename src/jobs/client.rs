use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::config::JobConfig;
use crate::error::ExtractionError;
use crate::fetcher::client::{FETCH_TIMEOUT, USER_AGENT};
use crate::jobs::types::{DatasetItem, JobInput, RunResponse, ScrapedPost};

pub struct ScrapeJobClient {
    client: Client,
    config: JobConfig,
}

impl ScrapeJobClient {
    pub fn new(config: JobConfig) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Starts a scrape of `url` and returns the dataset it will write to.
    #[instrument(skip(self))]
    pub async fn submit(&self, url: &str) -> Result<String, ExtractionError> {
        let input = JobInput {
            direct_urls: vec![url.to_string()],
        };

        let resp = self
            .client
            .post(&self.config.task_url)
            .query(&[("token", self.config.api_token.as_str())])
            .json(&input)
            .send()
            .await?;

        let run: RunResponse = read_json(resp).await?;
        let dataset_id = run
            .data
            .and_then(|data| data.default_dataset_id)
            .filter(|id| !id.trim().is_empty())
            .ok_or(ExtractionError::DatasetNotFound)?;

        info!(dataset_id = %dataset_id, "Scrape job started");
        Ok(dataset_id)
    }

    /// Polls the dataset until it holds at least one item, sleeping the
    /// configured interval between attempts.
    #[instrument(skip(self))]
    pub async fn wait_for_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>, ExtractionError> {
        let url = format!(
            "{}/datasets/{}/items",
            self.config.output_base_url.trim_end_matches('/'),
            dataset_id
        );

        for attempt in 1..=self.config.max_poll_attempts {
            let resp = self
                .client
                .get(&url)
                .query(&[("token", self.config.api_token.as_str())])
                .send()
                .await?;

            let items: Vec<DatasetItem> = read_json(resp).await?;
            if !items.is_empty() {
                info!(attempt, count = items.len(), "Dataset ready");
                return Ok(items);
            }

            debug!(attempt, "Dataset still empty");
            if attempt < self.config.max_poll_attempts {
                sleep(self.config.poll_interval).await;
            }
        }

        Err(ExtractionError::PollTimeout {
            dataset_id: dataset_id.to_string(),
            attempts: self.config.max_poll_attempts,
        })
    }

    /// Submit, poll and read the first scraped item of `url`.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedPost, ExtractionError> {
        let dataset_id = self.submit(url).await?;
        let items = self.wait_for_items(&dataset_id).await?;

        let first = items
            .into_iter()
            .next()
            .ok_or(ExtractionError::ContentEmpty)?;
        let caption = first.caption.ok_or(ExtractionError::ContentEmpty)?;
        let images = first.images.ok_or(ExtractionError::ImageNotFound)?;

        Ok(ScrapedPost { caption, images })
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ExtractionError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ExtractionError::ApiConnectionFailed(format!(
            "status {status}: {body}"
        )));
    }
    Ok(resp.json().await?)
}
