use bytes::{Bytes, BytesMut};
use once_cell::sync::Lazy;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue},
    redirect::Policy,
};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};

/// Fixed agent sent on every request.
pub const USER_AGENT: &str = "Mozilla/5.0";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;
const MAX_BODY_BYTES: u64 = 5 * 1024 * 1024;

const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml"];

static DOCUMENT_CLIENT: Lazy<Client> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.5"),
    );
    // Korean first: platforms pick the post language from this header.
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
    );

    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(FETCH_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
        .expect("Failed to build HTTP client")
});

/// GETs `url` and decodes it as an HTML document.
///
/// Non-2xx statuses, non-HTML bodies and bodies over 5 MB are errors; the
/// caller decides whether to retry.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(url: &str) -> Result<PageResponse, FetchError> {
    let target = url::Url::parse(url)?;

    let response = DOCUMENT_CLIENT
        .get(target)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            status,
            retriable: status.is_server_error(),
        });
    }

    let content_type = html_content_type(response.headers())?;
    if let Some(declared) = response.content_length()
        && declared > MAX_BODY_BYTES
    {
        return Err(FetchError::BodyTooLarge(declared));
    }

    let url_final = response.url().clone();
    let body = read_capped(response).await?;

    debug!(url_final = %url_final, bytes = body.len(), "Fetched document");
    process_response(url_final, status, &body, &content_type)
}

/// Content type of an HTML response; a missing header is taken as HTML.
fn html_content_type(headers: &HeaderMap) -> Result<String, FetchError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    let lowered = content_type.to_ascii_lowercase();
    if HTML_CONTENT_TYPES.iter().any(|html| lowered.contains(html)) {
        Ok(content_type)
    } else {
        Err(FetchError::UnsupportedContentType(content_type))
    }
}

/// Streams the body, stopping as soon as it passes the size cap. Servers
/// that omit or understate Content-Length are caught here.
async fn read_capped(mut response: Response) -> Result<Bytes, FetchError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?
    {
        body.extend_from_slice(&chunk);
        if body.len() as u64 > MAX_BODY_BYTES {
            return Err(FetchError::BodyTooLarge(body.len() as u64));
        }
    }
    Ok(body.freeze())
}
