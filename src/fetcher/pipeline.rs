use crate::fetcher::{
    errors::FetchError,
    types::{Charset, PageResponse},
};
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Bytes of the body scanned for in-document charset declarations.
const SNIFF_LEN: usize = 4096;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body: &[u8],
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let charset = detect_charset(content_type, body);
    let body_utf8 = decode_to_utf8(body, &charset)?;

    Ok(PageResponse {
        url_final,
        status,
        body_utf8,
        charset,
    })
}

fn charset_from_captures(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

pub(crate) fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = charset_from_captures(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // 2. <meta charset> / http-equiv in the document head
    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_LEN)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from_captures(&META_CHARSET_REGEX, &search_str) {
        return charset;
    }
    if let Some(charset) = charset_from_captures(&META_HTTP_EQUIV_REGEX, &search_str) {
        return charset;
    }

    // 3. Heuristic detection, hinted towards Korean content
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, search_bytes.len() == body_bytes.len());
    let detected = detector.guess(Some(b"kr"), true);

    Charset::from_encoding(detected)
}

fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        // Mostly a stray byte in an otherwise readable page; reject only when
        // nothing survived decoding.
        if decoded.chars().all(|c| c == char::REPLACEMENT_CHARACTER || c.is_whitespace()) {
            return Err(FetchError::Charset(format!(
                "Failed to decode content with encoding: {}",
                encoding.name()
            )));
        }
        warn!(encoding = encoding.name(), "Body contained undecodable bytes");
    }

    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_charset_from_content_type() {
        let content_type = "text/html; charset=utf-8";
        let body = b"<html><head><title>Test</title></head></html>";

        let charset = detect_charset(content_type, body);
        assert!(matches!(charset, Charset::Utf8));
    }

    #[test]
    fn test_detect_euc_kr_from_meta_tag() {
        let content_type = "text/html";
        let body = b"<html><head><meta charset=\"euc-kr\"><title>Test</title></head></html>";

        let charset = detect_charset(content_type, body);
        assert!(matches!(charset, Charset::EucKr));
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let content_type = "text/html";
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><title>Test</title></head></html>";

        let charset = detect_charset(content_type, body);
        assert!(matches!(charset, Charset::Windows1252));
    }

    #[test]
    fn test_decode_euc_kr() {
        let (encoded, _, _) = encoding_rs::EUC_KR.encode("안녕하세요 블로그");
        let decoded = decode_to_utf8(&encoded, &Charset::EucKr).unwrap();
        assert_eq!(decoded, "안녕하세요 블로그");
    }

    #[test]
    fn test_decode_utf8() {
        let body = "Hello, 세계!".as_bytes();
        let decoded = decode_to_utf8(body, &Charset::Utf8).unwrap();
        assert_eq!(decoded, "Hello, 세계!");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let body = [0xFF, 0xFE, 0xFF];
        assert!(matches!(
            decode_to_utf8(&body, &Charset::Utf8),
            Err(FetchError::Charset(_))
        ));
    }
}
