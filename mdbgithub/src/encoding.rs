//! Base64 transcoding for the contents API transport
//!
//! File bodies cross the wire base64-encoded, wrapped at 60 columns by the
//! provider. Everything goes through these byte-safe routines; decoding a
//! blob character-by-character would corrupt multi-byte UTF-8 and binary
//! payloads alike.

use crate::error::{GithubError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encodes raw bytes into the transport base64 form
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a transport base64 string into raw bytes
///
/// Whitespace is stripped first: the provider line-wraps the payload.
pub fn decode(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| GithubError::Encoding(format!("invalid base64: {}", e)))
}

/// Decodes a transport base64 string into UTF-8 text
pub fn decode_utf8(data: &str) -> Result<String> {
    let bytes = decode(data)?;
    String::from_utf8(bytes).map_err(|e| GithubError::Encoding(format!("invalid UTF-8: {}", e)))
}
