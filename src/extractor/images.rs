use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

/// Attributes consulted for an image's address, most preferred first.
pub const IMAGE_SOURCE_ATTRS: &[&str] = &["data-lazy-src", "data-origin-src", "src"];

/// Size variant requested from image CDNs in place of whatever the page used.
pub const IMAGE_SIZE_TYPE: &str = "w773";

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Image URLs under `container`, absolute, size-normalised and de-duplicated
/// in document order.
pub fn collect_images(container: ElementRef<'_>, base: &Url) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();

    for img in container.select(&IMG_SELECTOR) {
        let Some(source) = IMAGE_SOURCE_ATTRS
            .iter()
            .filter_map(|attr| img.value().attr(attr))
            .map(str::trim)
            .find(|src| !src.is_empty() && !src.starts_with("data:"))
        else {
            continue;
        };

        let Ok(absolute) = base.join(source) else {
            continue;
        };

        let normalized = with_size_suffix(&absolute);
        if !images.contains(&normalized) {
            images.push(normalized);
        }
    }
    images
}

/// Sets the `type` query parameter to [`IMAGE_SIZE_TYPE`], keeping every
/// other parameter.
pub fn with_size_suffix(url: &Url) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "type")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut sized = url.clone();
    sized
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("type", IMAGE_SIZE_TYPE);
    sized.into()
}
