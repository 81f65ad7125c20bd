//! Payload decoding: base64, gzip detection, UTF-8.

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::MultiGzDecoder;

use crate::error::DecodeError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Base64-decode a record's `data` field (standard alphabet, padded).
pub fn decode_base64(field: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(field)?)
}

/// Attempt gzip decompression. `None` means the bytes are not a complete,
/// valid gzip stream and should be treated as raw payload instead.
///
/// Concatenated gzip members decompress to the concatenation of their
/// contents.
pub fn gunzip(bytes: &[u8]) -> Option<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return None;
    }
    let mut decoder = MultiGzDecoder::new(bytes);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => Some(out),
        Err(err) => {
            tracing::trace!(error = %err, "payload is not gzip");
            None
        }
    }
}

/// Interpret a raw (non-gzip) payload as text.
pub fn decode_text(bytes: Vec<u8>) -> Result<String, DecodeError> {
    Ok(String::from_utf8(bytes)?)
}
