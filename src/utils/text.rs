//! # Text Transcoding
//!
//! UTF-8 ↔ Shift-JIS conversion at the codec boundary.
//!
//! The client speaks Shift-JIS; everything inside the server is UTF-8. Length fields on the wire
//! always count transcoded (Shift-JIS) bytes, so callers transcode first and measure second.
//!
//! Encoding is strict: a character with no Shift-JIS mapping is a
//! [`ProtocolError::TranscodingFailure`]. Decoding is lenient, matching the client's own
//! behaviour of showing a replacement glyph for garbage bytes.

use crate::config::PaddedStringFallback;
use crate::error::{ProtocolError, Result};
use encoding_rs::SHIFT_JIS;
use tracing::{debug, warn};

/// Encode UTF-8 text as Shift-JIS.
pub fn utf8_to_sjis(text: &str) -> Result<Vec<u8>> {
    let (encoded, _, had_unmappable) = SHIFT_JIS.encode(text);
    if had_unmappable {
        return Err(ProtocolError::TranscodingFailure(format!(
            "'{text}' is not representable in Shift-JIS"
        )));
    }
    Ok(encoded.into_owned())
}

/// Decode Shift-JIS bytes to UTF-8, replacing malformed sequences with U+FFFD.
pub fn sjis_to_utf8(bytes: &[u8]) -> String {
    let (decoded, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if had_errors {
        debug!(len = bytes.len(), "Replaced malformed Shift-JIS sequence");
    }
    decoded.into_owned()
}

/// Fixed-size, zero-padded string field.
///
/// The text (Shift-JIS transcoded when `transcode` is set) is truncated or padded to exactly
/// `size` bytes, and the last byte is always forced to `0`. When transcoding fails, `fallback`
/// decides between a zero-filled field and an error.
///
/// Truncation is byte-wise. When the forced terminator lands on the trail byte of a two-byte
/// Shift-JIS character, the lead byte stays in the field just before the `0`. The client reads
/// the field with the same layout.
pub fn padded_string(
    text: &str,
    size: usize,
    transcode: bool,
    fallback: PaddedStringFallback,
) -> Result<Vec<u8>> {
    let mut out = vec![0u8; size];
    if size == 0 {
        return Ok(out);
    }

    let encoded = if transcode {
        match utf8_to_sjis(text) {
            Ok(bytes) => bytes,
            Err(err) => match fallback {
                PaddedStringFallback::ZeroFill => {
                    warn!(size, "Padded string not transcodable, writing zero-filled field");
                    return Ok(out);
                }
                PaddedStringFallback::Error => return Err(err),
            },
        }
    } else {
        text.as_bytes().to_vec()
    };

    let count = encoded.len().min(size);
    out[..count].copy_from_slice(&encoded[..count]);
    out[size - 1] = 0;
    Ok(out)
}
