//! Tests for loading pages over HTTP.
#![cfg(feature = "fetch")]

use formfill_core::fetch::{self, FetchConfig, FetchError};

#[test]
fn test_rejects_bad_urls() {
    let config = FetchConfig::default();
    assert!(matches!(fetch::fetch("not a url", &config), Err(FetchError::InvalidUrl(_))));
    assert!(matches!(fetch::fetch("file:///etc/passwd", &config), Err(FetchError::InvalidUrl(_))));
}

#[test]
#[ignore]
fn test_fetch_real_form() {
    let page = fetch::fetch("https://httpbin.org/forms/post", &FetchConfig::default()).unwrap();
    assert!(!page.is_empty());
    assert!(page.url().starts_with("https://httpbin.org/"));
}
