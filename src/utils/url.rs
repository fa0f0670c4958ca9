//! URL encoding/decoding utilities

/// Encodes a string using percent encoding.
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Decodes a percent-encoded string.
///
/// Returns the original string if decoding fails, so malformed escapes in a
/// link never abort a parse on their own.
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_roundtrip() {
        assert_eq!(url_encode("Hello World!"), "Hello%20World%21");
        assert_eq!(url_decode("Hello%20World%21"), "Hello World!");
    }

    #[test]
    fn test_url_decode_invalid_escape() {
        assert_eq!(url_decode("bad%zz"), "bad%zz");
    }

}
