use serde::{Deserialize, Serialize};

/// Body of the task-start request.
#[derive(Debug, Clone, Serialize)]
pub struct JobInput {
    #[serde(rename = "directUrls")]
    pub direct_urls: Vec<String>,
}

/// Task-start response; only the dataset id is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub data: Option<RunData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "defaultDatasetId")]
    pub default_dataset_id: Option<String>,
}

/// One scraped post as written to the dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetItem {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, rename = "displayUrl")]
    pub display_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPost {
    pub caption: String,
    pub images: Vec<String>,
}
