//! Byte-order-mark sniffing and ordered encoding fallback.

use std::borrow::Cow;

use csvlite_core::errors::LoadError;
use encoding_rs::Encoding;
use tracing::debug;

/// Decode `bytes` with the first encoding that accepts them without
/// replacement characters. A byte-order mark picks the first candidate and
/// is stripped.
pub fn decode<'a>(
    source_id: &str,
    bytes: &'a [u8],
    fallbacks: &[&'static Encoding],
) -> Result<(Cow<'a, str>, &'static Encoding), LoadError> {
    let mut tried: Vec<&'static str> = Vec::new();

    let body = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => {
            let body = &bytes[bom_len..];
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(body) {
                debug!(source = source_id, encoding = encoding.name(), "decoded via byte-order mark");
                return Ok((text, encoding));
            }
            tried.push(encoding.name());
            body
        }
        None => bytes,
    };

    for &encoding in fallbacks {
        match encoding.decode_without_bom_handling_and_without_replacement(body) {
            Some(text) => {
                debug!(source = source_id, encoding = encoding.name(), "decoded");
                return Ok((text, encoding));
            }
            None => tried.push(encoding.name()),
        }
    }

    Err(LoadError::AllEncodingsFailed {
        source_id: source_id.to_string(),
        tried: tried.join(", "),
    })
}
