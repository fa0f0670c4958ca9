//! String coercion helpers shared by the link parsers

/// Returns the trimmed string, or `None` when it trims to nothing.
pub fn get_if_not_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Boolean-like query flags accept `true` or `1`, case-insensitively.
/// Anything else is false.
pub fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Strips one pair of surrounding double quotes, if present.
pub fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_if_not_blank() {
        assert_eq!(get_if_not_blank("  x "), Some("x".to_string()));
        assert_eq!(get_if_not_blank("   "), None);
        assert_eq!(get_if_not_blank(""), None);
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"/ws\""), "/ws");
        assert_eq!(strip_quotes("/ws"), "/ws");
        assert_eq!(strip_quotes("\"unterminated"), "\"unterminated");
    }
}
