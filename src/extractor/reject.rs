use crate::error::ExtractionError;

/// Fails when nothing usable survived extraction and normalisation.
///
/// A title alone does not count: it is page chrome, not content.
pub fn ensure_usable(url: &str, body: &str, places: &[String]) -> Result<(), ExtractionError> {
    if body.trim().is_empty() && places.iter().all(|p| p.trim().is_empty()) {
        return Err(ExtractionError::CrawlingFailed {
            url: url.to_string(),
            reason: "extracted content is empty".to_string(),
        });
    }
    Ok(())
}
