//! IP literal detection

use once_cell::sync::Lazy;
use regex::Regex;

static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").unwrap());

// Full form, trailing `::`, leading `::`, a `::` in the middle, or `::`
// alone. Group counts are not capped; this classifies, it does not validate.
static IPV6_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|:(:[0-9a-fA-F]{1,4}){1,7}|([0-9a-fA-F]{1,4}:)+(:[0-9a-fA-F]{1,4})+|::)$",
    )
    .unwrap()
});

/// Whether the address looks like an IPv4 literal.
pub fn is_ipv4(address: &str) -> bool {
    IPV4_RE.is_match(address)
}

/// Whether the address looks like an IPv6 literal (without brackets).
pub fn is_ipv6(address: &str) -> bool {
    IPV6_RE.is_match(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ipv4() {
        assert!(is_ipv4("192.168.1.1"));
        assert!(is_ipv4("10.0.0.1"));
        assert!(!is_ipv4("example.com"));
        assert!(!is_ipv4("2001:db8::1"));
    }

    #[test]
    fn test_is_ipv6() {
        assert!(is_ipv6("2001:db8::1"));
        assert!(is_ipv6("::"));
        assert!(is_ipv6("fe80::1"));
        assert!(!is_ipv6("192.168.1.1"));
        assert!(!is_ipv6("example.com"));
    }
}
