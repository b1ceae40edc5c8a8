//! Character encoding detection and transcoding.
//!
//! Byte input handed to [`crate::parse_bytes`] is not guaranteed to be
//! UTF-8. This module sniffs the charset declared in the document head and
//! transcodes to UTF-8 before the bytes reach the parser.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Charset declarations past this point are ignored, matching the usual
/// browser sniffing window.
const SNIFF_LIMIT: usize = 1024;

/// Match `<meta charset="...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CONTENT_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("valid regex")
});

/// Charset label declared in the head of the document, if any.
///
/// `<meta charset>` wins over the `http-equiv` form when both appear.
fn declared_charset(head: &str) -> Option<&str> {
    META_CHARSET_RE
        .captures(head)
        .or_else(|| META_CONTENT_TYPE_RE.captures(head))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Detect the character encoding of raw HTML bytes.
///
/// Only the first [`SNIFF_LIMIT`] bytes are examined. An unknown or missing
/// charset label falls back to UTF-8, the web default.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head);

    declared_charset(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Transcode raw HTML bytes to a UTF-8 string.
///
/// Decoding is lossy: byte sequences invalid in the detected encoding come
/// out as the Unicode replacement character rather than failing. A byte
/// order mark, when present, overrides the declared charset.
///
/// # Examples
///
/// ```
/// use html_pluck::encoding::decode_html;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
/// assert!(decode_html(html).contains("Caf\u{E9}"));
/// ```
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    // decode() BOM-sniffs before applying the detected encoding
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
