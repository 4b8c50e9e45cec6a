use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetcher::PageResponse;

/// The unit returned to callers and cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    pub image_urls: Vec<String>,
}

/// A parsed document owned by the extraction that fetched it.
///
/// `Html` is not `Send`; build this only after the last await of a fetch and
/// drop it before the next one.
pub struct FetchedDocument {
    pub url: Url,
    pub html: Html,
}

impl FetchedDocument {
    pub fn from_response(resp: &PageResponse) -> Self {
        Self::parse(resp.url_final.clone(), &resp.body_utf8)
    }

    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }
}

/// Strategy output before normalisation and chunking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExtraction {
    pub title: Option<String>,
    pub body: String,
    pub places: Vec<String>,
    pub image_urls: Vec<String>,
}

pub fn collapse_whitespace<'a>(pieces: impl IntoIterator<Item = &'a str>) -> String {
    pieces
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
