//! Header policy: default headers merged under caller-supplied ones.

use crate::constants::headers::{ACCEPT_JSON, CONTENT_TYPE_JSON};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

/// Merges caller-supplied headers with the default set.
///
/// Adds `Accept: application/json` and `Content-Type: application/json`
/// only for keys the caller did not supply. Header names compare
/// case-insensitively, which `HeaderMap` gives us for free. Pure function,
/// no failure cases.
pub fn with_defaults(headers: Option<HeaderMap>) -> HeaderMap {
    let mut merged = headers.unwrap_or_default();
    if !merged.contains_key(ACCEPT) {
        merged.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    }
    if !merged.contains_key(CONTENT_TYPE) {
        merged.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    }
    merged
}
