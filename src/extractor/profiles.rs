//! Selector sets for each supported platform.
//!
//! Container candidates are ordered: the first selector matching anything
//! wins, even if a later one would match a better element.

/// Subtrees dropped from every container before text is read.
pub const COMMON_NOISE: &[&str] = &[
    "script", "style", "noscript", "button", "input", "select", "textarea", "form", "iframe",
    "nav",
];

/// Map and place widgets whose text is reported as a separate section.
pub const PLACE_SELECTORS: &[&str] = &[
    ".se-map-title",
    ".se-map-address",
    ".se_mapTitle",
    ".se_mapAddress",
    ".place-name",
    "a[href*='map.naver.com']",
    "a[href*='map.kakao.com']",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorProfile {
    pub containers: &'static [&'static str],
    pub titles: &'static [&'static str],
    pub noise: &'static [&'static str],
    pub text: &'static str,
}

pub const NAVER_BLOG: SelectorProfile = SelectorProfile {
    containers: &[
        ".se-main-container",
        ".se_component_wrap",
        "#postViewArea",
        "#viewTypeSelector",
    ],
    titles: &[
        ".se-title-text",
        ".se_title .se_textarea",
        ".pcol1 .itemSubjectBoldfont",
        ".htitle",
        "meta[property='og:title']",
        "title",
    ],
    noise: &[
        ".se-oglink",
        ".se-module-map",
        ".se-placesMap",
        ".se-sticker",
        ".post_footer_contents",
        ".wrap_postcomment",
        ".area_sympathy",
    ],
    text: ".se-text-paragraph, .se-quote, p, h1, h2, h3, h4, li, blockquote",
};

pub const TISTORY: SelectorProfile = SelectorProfile {
    containers: &[
        ".tt_article_useless_p_margin",
        ".entry-content",
        ".article-view",
        "#article-view",
        ".contents_style",
        "#content .article",
        "article",
    ],
    titles: &[
        ".title-article",
        ".hgroup h1",
        ".post-cover h1",
        "h2.title",
        ".titleWrap h2",
        "meta[property='og:title']",
        "title",
    ],
    noise: &[
        ".another_category",
        ".container_postbtn",
        ".revenue_unit_wrap",
        ".tt-box-comment",
        ".area_related",
        ".related-articles",
        ".comments",
        "#comments",
        "figure.map",
    ],
    text: "p, h1, h2, h3, h4, li, blockquote",
};

pub const BRUNCH: SelectorProfile = SelectorProfile {
    containers: &[".wrap_body", ".wrap_article", ".wrap_item_body"],
    titles: &[
        ".cover_title",
        "h1.cover_title",
        "meta[property='og:title']",
        "title",
    ],
    noise: &[
        ".wrap_comment",
        ".wrap_keyword",
        ".wrap_profile",
        ".wrap_recommend",
        ".btn_more",
    ],
    text: "p, h2, h3, h4, li, blockquote",
};

pub const GENERIC: SelectorProfile = SelectorProfile {
    containers: &["body"],
    titles: &["title", "h1", "h2"],
    noise: &["header", "footer", "aside", ".sidebar", ".comments", "#comments"],
    text: "p, h1, h2, h3, h4, h5, h6, li",
};
