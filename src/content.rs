//! `contentEncoding` / `contentMediaType` support for the string keyword.
use crate::output::{ErrorReporter, ValidationOutput};
use crate::paths::JsonPointer;
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub(crate) fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}

/// Only `application/json` is actively checked: the (decoded) content must
/// parse. Every other media type passes through untouched.
pub(crate) fn content_media_type_check(
    keyword_location: &str,
    location: &JsonPointer,
    media_type: &str,
    content: &[u8],
    reporter: &mut dyn ErrorReporter,
) {
    if media_type == "application/json" {
        if let Err(error) = serde_json::from_slice::<serde_json::Value>(content) {
            reporter.report(ValidationOutput::new(
                location,
                format!("Content is not JSON: {}", error),
                "contentMediaType",
                keyword_location,
            ));
        }
    }
}
