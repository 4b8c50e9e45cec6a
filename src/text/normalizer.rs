use linkify::{LinkFinder, LinkKind};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Template placeholders: mustache tags and Tistory skin substitutions.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}|\[##_[^\]]*_##\]|\$\{[^{}]*\}").unwrap());

// Footer lines that open with a copyright notice. Mentions inside a
// sentence are content and stay.
static COPYRIGHT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*(?:copyright\b|©|\(c\))[^\n]*$").unwrap());

// Platform chrome that survives selector-level cleanup.
static BOILERPLATE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)all rights reserved\.?|designed by tistory|powered by (?:tistory|kakao)|저작자표시(?:\s*비영리)?(?:\s*변경금지)?|본문 바로가기|블로그 메뉴|이웃추가|URL 복사|신고하기|구독하기|이 블로그의 체크인|이 장소의 다른 글",
    )
    .unwrap()
});

// Lone UI labels, only when they make up a whole line.
static BOILERPLATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:공감|댓글|공유하기|좋아요|카테고리|태그|이전글|다음글|목록|맨 위로)[ \t]*\d*[ \t]*$").unwrap()
});

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]\n]*\]|\([^()\n]*\)|【[^【】\n]*】|（[^（）\n]*）").unwrap());

static EMOJI_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x{1F000}-\x{1FAFF}\x{2190}-\x{21FF}\x{2300}-\x{23FF}\x{2460}-\x{24FF}\x{25A0}-\x{27BF}\x{2900}-\x{297F}\x{2B00}-\x{2BFF}\x{3297}\x{3299}\x{FE00}-\x{FE0F}\x{200B}-\x{200D}\x{20E3}\x{E0020}-\x{E007F}]",
    )
    .unwrap()
});

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]+>").unwrap());

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[\p{L}\p{N}_]+").unwrap());

static CARRIAGE_RETURN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n?").unwrap());

static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]+").unwrap());

static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n\s*").unwrap());

/// Cleans extracted text for downstream consumption.
///
/// Steps run in a fixed order (URLs before tags, so `http://` inside an
/// attribute is not mangled), and the whole sequence is repeated until the
/// output stops changing, which makes the function idempotent. No step ever
/// lengthens the text, so every pass either shrinks it or only canonicalises
/// whitespace, and the loop terminates.
pub fn normalize(text: &str) -> String {
    let mut current = normalize_once(text);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(text: &str) -> String {
    let text = PLACEHOLDER.replace_all(text, "");
    let text = COPYRIGHT_LINE.replace_all(&text, "");
    let text = BOILERPLATE_PHRASE.replace_all(&text, "");
    let text = BOILERPLATE_LINE.replace_all(&text, "");
    let text = BRACKETED.replace_all(&text, "");
    let text = EMOJI_SYMBOL.replace_all(&text, "");
    let text = strip_urls(&text);
    let text = HTML_TAG.replace_all(&text, "");
    let text = HASHTAG.replace_all(&text, "");
    let text = CARRIAGE_RETURN.replace_all(&text, "\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = LINE_BREAKS.replace_all(&text, "\n");
    text.trim().to_string()
}

fn strip_urls(text: &str) -> Cow<'_, str> {
    let mut finder = LinkFinder::new();
    finder.kinds(&[LinkKind::Url]);

    let mut links = finder.links(text).peekable();
    if links.peek().is_none() {
        return Cow::Borrowed(text);
    }

    let mut stripped = String::with_capacity(text.len());
    let mut last = 0;
    for link in links {
        stripped.push_str(&text[last..link.start()]);
        last = link.end();
    }
    stripped.push_str(&text[last..]);
    Cow::Owned(stripped)
}
