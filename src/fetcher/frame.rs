//! Nested-frame resolution for platforms that serve an outer shell page and
//! load the real post into an `<iframe>`.

use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::fetcher::{errors::FetchError, fetch, types::PageResponse};

/// Where a platform keeps its inner document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRule {
    pub selector: &'static str,
    pub source_attr: &'static str,
}

/// Soft failure: the outer document is used instead of the frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameResolutionDegraded {
    #[error("no element matches frame selector {0:?}")]
    MissingFrame(&'static str),

    #[error("frame source attribute is empty")]
    EmptySource,

    #[error("frame source {0:?} cannot be resolved")]
    InvalidSource(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameResolution {
    Resolved(Url),
    Degraded(FrameResolutionDegraded),
}

/// Finds the frame's source in `html`, resolved against `base`.
pub fn resolve_frame_source(
    html: &str,
    base: &Url,
    rule: &FrameRule,
) -> Result<Url, FrameResolutionDegraded> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(rule.selector)
        .map_err(|_| FrameResolutionDegraded::MissingFrame(rule.selector))?;

    let frame = document
        .select(&selector)
        .next()
        .ok_or(FrameResolutionDegraded::MissingFrame(rule.selector))?;

    let source = frame
        .value()
        .attr(rule.source_attr)
        .map(str::trim)
        .unwrap_or_default();
    if source.is_empty() {
        return Err(FrameResolutionDegraded::EmptySource);
    }

    // Url::join handles both absolute sources and paths relative to the shell.
    base.join(source)
        .map_err(|_| FrameResolutionDegraded::InvalidSource(source.to_string()))
}

/// Fetches `url` and, when it carries a frame matching `rule`, the inner
/// document. A missing or empty frame source falls back to the outer page.
#[instrument(skip(rule), fields(frame = rule.selector))]
pub async fn fetch_framed(
    url: &str,
    rule: &FrameRule,
) -> Result<(PageResponse, FrameResolution), FetchError> {
    let outer = fetch(url).await?;

    match resolve_frame_source(&outer.body_utf8, &outer.url_final, rule) {
        Ok(inner_url) => {
            info!(inner = %inner_url, "Following nested frame");
            let inner = fetch(inner_url.as_str()).await?;
            Ok((inner, FrameResolution::Resolved(inner_url)))
        }
        Err(degraded) => {
            warn!(reason = %degraded, "Frame resolution degraded, using outer document");
            Ok((outer, FrameResolution::Degraded(degraded)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: FrameRule = FrameRule {
        selector: "iframe#mainFrame",
        source_attr: "src",
    };

    fn base() -> Url {
        Url::parse("https://blog.naver.com/someone/223000000000").unwrap()
    }

    #[test]
    fn test_relative_source_resolves_against_base() {
        let html = r#"<html><body><iframe id="mainFrame" src="/PostView.naver?blogId=someone&logNo=223000000000"></iframe></body></html>"#;
        let url = resolve_frame_source(html, &base(), &RULE).unwrap();
        assert_eq!(
            url.as_str(),
            "https://blog.naver.com/PostView.naver?blogId=someone&logNo=223000000000"
        );
    }

    #[test]
    fn test_absolute_source_kept() {
        let html = r#"<iframe id="mainFrame" src="https://m.blog.naver.com/PostView.naver?logNo=1"></iframe>"#;
        let url = resolve_frame_source(html, &base(), &RULE).unwrap();
        assert_eq!(url.host_str(), Some("m.blog.naver.com"));
    }

    #[test]
    fn test_missing_frame_degrades() {
        let html = "<html><body><p>no frame here</p></body></html>";
        assert_eq!(
            resolve_frame_source(html, &base(), &RULE),
            Err(FrameResolutionDegraded::MissingFrame("iframe#mainFrame"))
        );
    }

    #[test]
    fn test_empty_source_degrades() {
        let html = r#"<iframe id="mainFrame" src="  "></iframe>"#;
        assert_eq!(
            resolve_frame_source(html, &base(), &RULE),
            Err(FrameResolutionDegraded::EmptySource)
        );
    }
}
