//! Character encoding of sidecar files
//!
//! Scrapers do not always write UTF-8. The encoding comes from the byte
//! order mark, else from the XML declaration, else UTF-8 is assumed.

use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

use crate::errors::SidecarError;

/// Decode raw sidecar bytes to text
///
/// Fails only when the bytes are not valid in the detected encoding or the
/// declared encoding is unknown.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, SidecarError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => match declared_encoding(bytes) {
            Some(label) => {
                let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                    SidecarError::Malformed(format!("unsupported encoding '{}'", label))
                })?;
                (encoding, bytes)
            }
            None => (UTF_8, bytes),
        },
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            SidecarError::Malformed(format!("content is not valid {}", encoding.name()))
        })
}

/// Value of the `encoding` pseudo-attribute of a leading XML declaration
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let trimmed = bytes.trim_ascii_start();
    if !trimmed.starts_with(b"<?xml") {
        return None;
    }
    let end = trimmed.windows(2).position(|pair| pair == b"?>")?;
    let declaration = String::from_utf8_lossy(&trimmed[..end]);

    let (_, rest) = declaration.split_once("encoding")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let close = value.find(quote)?;
    Some(value[..close].trim().to_string())
}
