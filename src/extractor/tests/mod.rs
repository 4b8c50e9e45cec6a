use std::fs;
use url::Url;

use crate::error::ExtractionError;
use crate::extractor::{
    ExtractionResult, FetchedDocument, PLACE_SECTION_MARKER, TITLE_LABEL, compose_caption,
    extract,
    images::IMAGE_SIZE_TYPE,
    profiles::{BRUNCH, GENERIC, NAVER_BLOG, SelectorProfile, TISTORY},
};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn run(name: &str, url: &str, profile: &SelectorProfile) -> Result<ExtractionResult, ExtractionError> {
    let doc = FetchedDocument::parse(Url::parse(url).unwrap(), &fixture(name));
    extract(&doc, profile)
}

#[test]
fn test_tistory_second_skin() {
    let result = run("tistory_skin.html", "https://example.tistory.com/1", &TISTORY).unwrap();

    assert!(result.text.starts_with(&format!("{TITLE_LABEL}성수동 카페 투어\n")));
    assert!(result.text.contains("천천히 둘러보았습니다."));
    assert!(result.text.contains("분위기도 조용했습니다"));

    // Noise subtrees and stripped fragments never reach the text.
    assert!(!result.text.contains("trackPageView"));
    assert!(!result.text.contains("공감 버튼"));
    assert!(!result.text.contains("관련 글 목록"));
    assert!(!result.text.contains("댓글 내용"));
    assert!(!result.text.contains("https://"));
    assert!(!result.text.contains("😊"));
    assert!(!result.text.contains("\n메뉴"));

    assert!(result.text.ends_with(&format!("{PLACE_SECTION_MARKER}\n성수 베이커리 카페")));

    assert_eq!(
        result.image_urls,
        vec![
            "https://blog.kakaocdn.net/dn/abc/img.jpg?type=w773",
            "https://blog.kakaocdn.net/dn/def/img.png?type=w773",
        ]
    );
    assert!(result.image_urls.iter().all(|u| u.ends_with(&format!("?type={IMAGE_SIZE_TYPE}"))));
}

#[test]
fn test_naver_smart_editor_post() {
    let result = run(
        "naver_post.html",
        "https://blog.naver.com/PostView.naver?blogId=someone&logNo=1",
        &NAVER_BLOG,
    )
    .unwrap();

    assert!(result.text.starts_with("제목: 망원동 국수집 후기\n"));
    assert!(result.text.contains("작은 국수집을 다녀왔어요."));
    assert!(result.text.contains("육수가 진하고 면이 쫄깃해서 좋았습니다."));
    assert!(!result.text.contains("짧음"));
    assert!(!result.text.contains("링크 카드"));
    assert!(!result.text.contains("공감한 블로거"));
    assert!(result.text.contains(&format!(
        "{PLACE_SECTION_MARKER}\n망원 국수 서울 마포구 망원동 123-4"
    )));

    assert_eq!(
        result.image_urls,
        vec!["https://postfiles.pstatic.net/MjAy/a.jpg?type=w773"]
    );
}

#[test]
fn test_brunch_post() {
    let result = run("brunch.html", "https://brunch.co.kr/@writer/12", &BRUNCH).unwrap();

    assert!(result.text.starts_with("제목: 퇴사 후 첫 여행\n"));
    assert!(result.text.contains("떠나기로 한 날의 기록"));
    assert!(result.text.contains("기차표를 사는 것이었다."));
    assert!(!result.text.contains("키워드 목록"));
    assert!(!result.text.contains("잘 읽었습니다"));
    assert!(!result.text.contains(PLACE_SECTION_MARKER));
    assert_eq!(result.image_urls.len(), 1);
}

#[test]
fn test_generic_fallback() {
    let result = run("generic.html", "https://example.com/releases/2.0", &GENERIC).unwrap();

    assert!(result.text.starts_with("제목: Release notes\n"));
    assert!(result.text.contains("Version 2.0 released"));
    assert!(result.text.contains("one-time migration of existing data files."));
    assert!(!result.text.contains("navigation"));
    assert!(!result.text.contains("Copyright"));
    assert_eq!(
        result.image_urls,
        vec!["https://example.com/static/diagram.png?type=w773"]
    );
}

#[test]
fn test_noise_only_container_fails() {
    let result = run("noise_only.html", "https://example.tistory.com/2", &TISTORY);

    match result {
        Err(ExtractionError::CrawlingFailed { url, .. }) => {
            assert_eq!(url, "https://example.tistory.com/2");
        }
        other => panic!("Expected CrawlingFailed, got {other:?}"),
    }
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed paragraph with enough text<div>More content";
    let doc = FetchedDocument::parse(Url::parse("https://example.com/broken").unwrap(), html);

    // Should handle malformed HTML gracefully
    let result = extract(&doc, &GENERIC).unwrap();
    assert!(result.text.starts_with("제목: Broken\n"));
    assert!(result.text.contains("Unclosed paragraph"));
}

#[test]
fn test_long_post_is_batched() {
    let paragraph = format!("<p>{}</p>", "긴 문장을 여러 번 반복해서 본문을 만듭니다. ".repeat(4));
    let html = format!(
        "<html><head><title>긴 글</title></head><body>{}</body></html>",
        paragraph.repeat(60)
    );
    let doc = FetchedDocument::parse(Url::parse("https://example.com/long").unwrap(), &html);

    let result = extract(&doc, &GENERIC).unwrap();
    // Chunks inside a batch are newline-joined.
    assert!(result.text.matches('\n').count() > 2);
    assert!(result.text.starts_with("제목: 긴 글\n"));
}

#[test]
fn test_caption_is_normalised() {
    let result = compose_caption("오늘의 라떼 ☕ #카페 https://instagr.am/x", vec!["a.jpg".into()]);
    assert_eq!(result.text, "오늘의 라떼");
    assert_eq!(result.image_urls, vec!["a.jpg"]);
}

#[test]
fn test_tag_only_caption_is_still_a_post() {
    let result = compose_caption("#맛집 #카페 😋", vec!["a.jpg".into()]);
    assert_eq!(result.text, "");
    assert_eq!(result.image_urls, vec!["a.jpg"]);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let doc = FetchedDocument::parse(Url::parse("https://example.com").unwrap(), &html);
            for profile in [&NAVER_BLOG, &TISTORY, &BRUNCH, &GENERIC] {
                let _ = extract(&doc, profile);
            }
        }
    }
}
