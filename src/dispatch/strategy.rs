use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::error::ExtractionError;
use crate::extractor::{
    ExtractionResult, FetchedDocument, SelectorProfile, compose_caption, extract,
    profiles::{BRUNCH, GENERIC, NAVER_BLOG, TISTORY},
};
use crate::fetcher::{FrameRule, fetch, frame::fetch_framed};
use crate::jobs::ScrapeJobClient;

/// Naver blog posts live in `iframe#mainFrame` of the blog shell page.
pub const NAVER_MAIN_FRAME: FrameRule = FrameRule {
    selector: "iframe#mainFrame",
    source_attr: "src",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    NaverBlog,
    Tistory,
    Brunch,
    Instagram,
    Generic,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NaverBlog => "naver_blog",
            Self::Tistory => "tistory",
            Self::Brunch => "brunch",
            Self::Instagram => "instagram",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn host_is(url: &Url, domain: &str) -> bool {
    url.host_str().is_some_and(|host| {
        host == domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

pub fn is_naver_blog(url: &Url) -> bool {
    matches!(url.host_str(), Some("blog.naver.com" | "m.blog.naver.com"))
}

pub fn is_tistory(url: &Url) -> bool {
    host_is(url, "tistory.com")
}

pub fn is_brunch(url: &Url) -> bool {
    host_is(url, "brunch.co.kr")
}

pub fn is_instagram(url: &Url) -> bool {
    host_is(url, "instagram.com")
}

pub fn any_url(_: &Url) -> bool {
    true
}

/// Fetch-then-extract over a selector profile.
#[derive(Debug, Clone, Copy)]
pub struct DocumentStrategy {
    pub platform: Platform,
    pub matches: fn(&Url) -> bool,
    pub profile: SelectorProfile,
    pub frame: Option<FrameRule>,
}

impl DocumentStrategy {
    /// Returns the result together with the location of the document it was
    /// read from: the post-redirect URL, or the frame's URL when one was
    /// followed.
    #[instrument(skip_all, fields(platform = %self.platform, url = %url))]
    pub async fn run(&self, url: &Url) -> Result<(ExtractionResult, Url), ExtractionError> {
        let page = match &self.frame {
            Some(rule) => fetch_framed(url.as_str(), rule).await?.0,
            None => fetch(url.as_str()).await?,
        };

        debug!(final_url = %page.url_final, charset = ?page.charset, "Parsing fetched document");

        // Parsed only after the last await; the tree never crosses threads.
        let doc = FetchedDocument::from_response(&page);
        let result = extract(&doc, &self.profile)?;
        Ok((result, doc.url))
    }
}

/// Submit-then-poll through the external scraping service.
#[derive(Debug, Clone, Copy)]
pub struct JobStrategy {
    pub platform: Platform,
    pub matches: fn(&Url) -> bool,
}

impl JobStrategy {
    #[instrument(skip_all, fields(platform = %self.platform, url = %url))]
    pub async fn run(
        &self,
        client: &ScrapeJobClient,
        url: &Url,
    ) -> Result<ExtractionResult, ExtractionError> {
        let post = client.scrape(url.as_str()).await?;
        Ok(compose_caption(&post.caption, post.images))
    }
}

/// One way of turning a URL into an [`ExtractionResult`].
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    Document(DocumentStrategy),
    ExternalJob(JobStrategy),
}

impl Strategy {
    pub fn naver_blog() -> Self {
        Self::Document(DocumentStrategy {
            platform: Platform::NaverBlog,
            matches: is_naver_blog,
            profile: NAVER_BLOG,
            frame: Some(NAVER_MAIN_FRAME),
        })
    }

    pub fn tistory() -> Self {
        Self::Document(DocumentStrategy {
            platform: Platform::Tistory,
            matches: is_tistory,
            profile: TISTORY,
            frame: None,
        })
    }

    pub fn brunch() -> Self {
        Self::Document(DocumentStrategy {
            platform: Platform::Brunch,
            matches: is_brunch,
            profile: BRUNCH,
            frame: None,
        })
    }

    pub fn instagram() -> Self {
        Self::ExternalJob(JobStrategy {
            platform: Platform::Instagram,
            matches: is_instagram,
        })
    }

    pub fn generic() -> Self {
        Self::Document(DocumentStrategy {
            platform: Platform::Generic,
            matches: any_url,
            profile: GENERIC,
            frame: None,
        })
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::Document(s) => s.platform,
            Self::ExternalJob(s) => s.platform,
        }
    }

    pub fn supports(&self, url: &Url) -> bool {
        match self {
            Self::Document(s) => (s.matches)(url),
            Self::ExternalJob(s) => (s.matches)(url),
        }
    }

    pub fn is_external_job(&self) -> bool {
        matches!(self, Self::ExternalJob(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_host_matching() {
        assert!(is_tistory(&url("https://example.tistory.com/1")));
        assert!(is_tistory(&url("https://tistory.com/")));
        assert!(!is_tistory(&url("https://nottistory.com/1")));
        assert!(!is_tistory(&url("https://tistory.com.evil.io/1")));

        assert!(is_naver_blog(&url("https://blog.naver.com/someone/2230")));
        assert!(is_naver_blog(&url("https://m.blog.naver.com/someone/2230")));
        assert!(!is_naver_blog(&url("https://news.naver.com/article/1")));

        assert!(is_instagram(&url("https://www.instagram.com/p/abc/")));
        assert!(is_instagram(&url("https://instagram.com/reel/xyz")));
        assert!(is_brunch(&url("https://brunch.co.kr/@writer/12")));
    }

    #[test]
    fn test_strategy_shapes() {
        assert!(Strategy::instagram().is_external_job());
        assert!(!Strategy::naver_blog().is_external_job());
        assert_eq!(Strategy::generic().platform(), Platform::Generic);
        assert!(Strategy::generic().supports(&url("ftp-ish://whatever")));
    }
}
