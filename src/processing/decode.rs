//! # Base64 Image Extraction
//!
//! Clients send images either as bare standard base64 or as a data URI
//! (`data:image/jpeg;base64,<payload>`). The prefix is discarded purely
//! syntactically; the MIME type is never inspected.

use base64::{engine::general_purpose, DecodeError, Engine as _};

/// Drop a `data:` URI header, keeping only what follows the first comma.
///
/// Strings that do not start with `data:`, or that contain no comma, are
/// returned unchanged.
pub fn strip_data_uri(image: &str) -> &str {
    if !image.starts_with("data:") {
        return image;
    }
    match image.find(',') {
        Some(comma) => &image[comma + 1..],
        None => image,
    }
}

/// Decode an inbound image string into raw bytes.
///
/// # Errors
/// Returns the base64 error when the payload is not valid standard base64.
///
/// # Example
/// ```ignore
/// let bytes = decode_image("data:image/png;base64,AQID")?;
/// assert_eq!(bytes, vec![1, 2, 3]);
/// ```
pub fn decode_image(image: &str) -> Result<Vec<u8>, DecodeError> {
    general_purpose::STANDARD.decode(strip_data_uri(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,AQID"), "AQID");
        assert_eq!(strip_data_uri("AQID"), "AQID");
        assert_eq!(strip_data_uri("data:no-comma"), "data:no-comma");
        // only the first comma counts
        assert_eq!(strip_data_uri("data:x,AQ,ID"), "AQ,ID");
    }

    #[test]
    fn test_prefixed_and_bare_decode_identically() {
        let bare = decode_image("/9j/4AAQSkZJRg==").unwrap();
        let prefixed = decode_image("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap();

        assert_eq!(bare, prefixed);
        assert_eq!(&bare[..4], &[0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_invalid_base64() {
        assert!(decode_image("not-base64-@@@").is_err());
        assert!(decode_image("data:image/jpeg;base64,@@@@").is_err());
    }

    #[test]
    fn test_prefix_without_comma_is_decoded_as_is() {
        // "data:" is not valid base64, so the whole string fails
        assert!(decode_image("data:image/jpeg;base64").is_err());
    }
}
