pub mod cleaner;
pub mod images;
pub mod model;
pub mod profiles;
pub mod reader;
pub mod reject;

#[cfg(test)]
mod tests;

pub use model::{ExtractionResult, FetchedDocument, RawExtraction};
pub use profiles::SelectorProfile;

use crate::error::ExtractionError;
use crate::text::{normalize, segment};

/// Label placed in front of the post title.
pub const TITLE_LABEL: &str = "제목: ";

/// Separator line introducing the place-mention section.
pub const PLACE_SECTION_MARKER: &str = "--- 장소 정보 ---";

/// Extracts, normalises and segments `doc` with the selectors of `profile`.
pub fn extract(
    doc: &FetchedDocument,
    profile: &SelectorProfile,
) -> Result<ExtractionResult, ExtractionError> {
    let raw = reader::read_document(doc, profile)?;
    compose(doc.url.as_str(), raw)
}

/// Turns a raw extraction into the final result.
///
/// Title, body and places are normalised separately and assembled as a
/// labelled title line, the body, then the place section; the assembled text
/// is chunked and batched.
pub fn compose(url: &str, raw: RawExtraction) -> Result<ExtractionResult, ExtractionError> {
    let body = normalize(&raw.body);
    let places: Vec<String> = raw
        .places
        .iter()
        .map(|place| normalize(place))
        .filter(|place| !place.is_empty())
        .collect();

    reject::ensure_usable(url, &body, &places)?;

    let mut text = String::new();
    if let Some(title) = raw
        .title
        .as_deref()
        .map(normalize)
        .filter(|title| !title.is_empty())
    {
        text.push_str(TITLE_LABEL);
        text.push_str(&title);
        text.push_str("\n\n");
    }
    text.push_str(&body);
    if !places.is_empty() {
        if !body.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(PLACE_SECTION_MARKER);
        text.push('\n');
        text.push_str(&places.join("\n"));
    }

    Ok(ExtractionResult {
        text: segment(&text),
        image_urls: raw.image_urls,
    })
}

/// Result for a caption scraped by an external job. Images pass through as
/// the scraping service reported them.
///
/// A caption made only of hashtags or emoji normalises to empty text; the
/// post is still valid, only a missing caption field is fatal.
pub fn compose_caption(caption: &str, image_urls: Vec<String>) -> ExtractionResult {
    ExtractionResult {
        text: segment(&normalize(caption)),
        image_urls,
    }
}
