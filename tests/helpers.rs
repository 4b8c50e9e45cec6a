#![allow(dead_code)]

use std::time::Duration;

use linkdigest::config::{Config, JobConfig};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Job settings pointing at `server`, polling every 10ms.
pub fn job_config(server: &MockServer, max_poll_attempts: u32) -> JobConfig {
    JobConfig {
        api_token: "secret".to_string(),
        task_url: format!("{}/runs", server.uri()),
        output_base_url: server.uri(),
        poll_interval: Duration::from_millis(10),
        max_poll_attempts,
    }
}

pub fn test_config(server: &MockServer) -> Config {
    Config {
        job: job_config(server, 5),
        ..Config::default()
    }
}

pub async fn mount_dataset_id(server: &MockServer, dataset_id: &str) {
    Mock::given(method("POST"))
        .and(path("/runs"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({
                "data": {"id": "run-1", "defaultDatasetId": dataset_id}
            })),
        )
        .mount(server)
        .await;
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body.to_string(), "text/html; charset=utf-8")
}
