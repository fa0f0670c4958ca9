use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    STANDARD.encode(input)
}

/// Encodes a string to URL-safe Base64 format without padding.
pub fn url_safe_base64_encode(input: &str) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decodes a Base64 string, accepting the standard and URL-safe alphabets
/// with or without padding.
///
/// Returns `None` when the input is not valid Base64 or does not decode to
/// valid UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    let trimmed = input.trim();
    for engine in [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD] {
        if let Ok(bytes) = engine.decode(trimmed) {
            if let Ok(text) = String::from_utf8(bytes) {
                return Some(text);
            }
        }
    }
    None
}

/// Decodes a Base64 string, falling back to the literal input when it is not
/// valid Base64. Share links mix encoded and plain segments freely, so every
/// credential block goes through this.
pub fn decode_base64_or_original(input: &str) -> String {
    base64_decode(input).unwrap_or_else(|| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_standard() {
        assert_eq!(
            decode_base64_or_original("YWVzLTI1Ni1nY206cGFzcw=="),
            "aes-256-gcm:pass"
        );
    }

    #[test]
    fn test_decode_without_padding() {
        assert_eq!(decode_base64_or_original("cGFzcw"), "pass");
    }

    #[test]
    fn test_decode_falls_back_to_literal() {
        assert_eq!(
            decode_base64_or_original("aes-256-gcm:pass"),
            "aes-256-gcm:pass"
        );
    }

    #[test]
    fn test_roundtrip_url_safe() {
        let encoded = url_safe_base64_encode("subject?/+test");
        assert_eq!(decode_base64_or_original(&encoded), "subject?/+test");
    }
}
