use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::extractor::model::collapse_whitespace;

/// Text blocks at or below this many characters are menu and label noise.
pub const MIN_TEXT_LENGTH: usize = 10;

/// Re-parses `container` into an owned fragment with every subtree matching
/// one of `noise` detached.
pub fn strip_noise<'a>(container: ElementRef<'_>, noise: impl IntoIterator<Item = &'a str>) -> Html {
    let mut fragment = Html::parse_fragment(&container.html());

    for raw in noise {
        let Ok(selector) = Selector::parse(raw) else {
            warn!(selector = raw, "Skipping unparseable noise selector");
            continue;
        };
        let doomed: Vec<_> = fragment.select(&selector).map(|el| el.id()).collect();
        for id in doomed {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fragment
}

/// Joins the text of every outermost element matching `selector`, one block
/// per line, dropping blocks of `MIN_TEXT_LENGTH` characters or fewer.
pub fn collect_text(fragment: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        warn!(selector, "Unparseable text selector");
        return String::new();
    };

    let matched: Vec<ElementRef> = fragment.select(&selector).collect();
    let matched_ids: HashSet<_> = matched.iter().map(|el| el.id()).collect();

    matched
        .iter()
        .filter(|el| !el.ancestors().any(|a| matched_ids.contains(&a.id())))
        .map(|el| collapse_whitespace(el.text()))
        .filter(|text| text.chars().count() > MIN_TEXT_LENGTH)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Distinct, non-empty texts of the outermost elements matching any of
/// `selectors`, in document order.
pub fn collect_places(container: ElementRef<'_>, selectors: &[&str]) -> Vec<String> {
    let mut matched_ids = HashSet::new();
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        matched_ids.extend(container.select(&selector).map(|el| el.id()));
    }

    let mut places: Vec<String> = Vec::new();
    for el in container.descendants().filter_map(ElementRef::wrap) {
        if !matched_ids.contains(&el.id()) || el.ancestors().any(|a| matched_ids.contains(&a.id())) {
            continue;
        }
        let text = collapse_whitespace(el.text());
        if !text.is_empty() && !places.contains(&text) {
            places.push(text);
        }
    }
    places
}
