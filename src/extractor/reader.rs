use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::extractor::{
    cleaner::{collect_places, collect_text, strip_noise},
    images::collect_images,
    model::{FetchedDocument, RawExtraction, collapse_whitespace},
    profiles::{COMMON_NOISE, PLACE_SELECTORS, SelectorProfile},
};

/// Runs the selector pipeline of `profile` over `doc`.
///
/// Only a missing content container is an error here; a missing title or an
/// empty body degrade the result and are judged later.
pub fn read_document(
    doc: &FetchedDocument,
    profile: &SelectorProfile,
) -> Result<RawExtraction, ExtractionError> {
    let Some((skin, container)) = find_container(&doc.html, profile.containers) else {
        return Err(ExtractionError::CrawlingFailed {
            url: doc.url.to_string(),
            reason: "no content container matched".to_string(),
        });
    };
    debug!(skin, url = %doc.url, "Matched content container");

    let title = extract_title(&doc.html, profile.titles);
    if title.is_none() {
        warn!(url = %doc.url, "No title found, continuing without one");
    }

    // Images and places come from the untouched container; noise removal
    // would drop decorative images and map widgets that are still wanted.
    let image_urls = collect_images(container, &doc.url);
    let places = collect_places(container, PLACE_SELECTORS);

    let cleaned = strip_noise(
        container,
        COMMON_NOISE.iter().chain(profile.noise).copied(),
    );
    let body = collect_text(&cleaned, profile.text);

    Ok(RawExtraction {
        title,
        body,
        places,
        image_urls,
    })
}

/// First candidate selector with at least one match, and its first element.
fn find_container<'a>(
    html: &'a Html,
    candidates: &[&'static str],
) -> Option<(&'static str, ElementRef<'a>)> {
    candidates.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        html.select(&selector).next().map(|el| (*raw, el))
    })
}

/// First non-empty title among `candidates`; `<meta>` candidates yield their
/// `content` attribute.
pub fn extract_title(html: &Html, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        html.select(&selector).find_map(|el| {
            let title = if el.value().name() == "meta" {
                collapse_whitespace(el.value().attr("content"))
            } else {
                collapse_whitespace(el.text())
            };
            (!title.is_empty()).then_some(title)
        })
    })
}
