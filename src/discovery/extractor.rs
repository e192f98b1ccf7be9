use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use scraper::Html;

use crate::config::MIN_BASE64_BLOB_LEN;

/// Strips markup and joins the remaining text nodes with single spaces.
///
/// Each text node is trimmed and empty nodes are dropped; whitespace inside a
/// node (e.g. newlines in a raw subscription file) is kept as-is.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes a page that is nothing but a base64 subscription payload.
pub fn decode_subscription_blob(text: &str) -> Option<String> {
    let blob: String = text.split_whitespace().collect();
    if blob.len() < MIN_BASE64_BLOB_LEN {
        return None;
    }
    if !blob
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_' | b'='))
    {
        return None;
    }

    let decoded = [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(blob.as_bytes()).ok())?;

    String::from_utf8(decoded).ok()
}

/// Converts a fetched body to the text the matcher scans.
pub fn extract_page_text(body: &str, decode_base64: bool) -> String {
    let text = html_to_text(body);
    if decode_base64 {
        if let Some(decoded) = decode_subscription_blob(&text) {
            return format!("{}\n{}", text, decoded);
        }
    }
    text
}
