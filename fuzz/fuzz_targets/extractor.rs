#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use linkdigest::extractor::{
    FetchedDocument, extract,
    profiles::{BRUNCH, GENERIC, NAVER_BLOG, TISTORY},
};
use linkdigest::text::{normalize, segment};

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let html = String::from_utf8_lossy(data);

    let doc = FetchedDocument::parse(Url::parse("https://example.com").unwrap(), &html);

    // No profile may panic, whatever the markup
    for profile in [&NAVER_BLOG, &TISTORY, &BRUNCH, &GENERIC] {
        let _ = extract(&doc, profile);
    }

    let once = normalize(&html);
    assert_eq!(normalize(&once), once);
    let _ = segment(&once);
});
