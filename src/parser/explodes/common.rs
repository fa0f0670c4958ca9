//! Scheme dispatch and the primitives shared by every link parser.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ProxyNode;
use crate::parser::ParseError;
use crate::utils::url::url_decode;

/// Parse a single share link into a proxy entry.
///
/// Dispatches on the text before `://`; scheme aliases (`hy2`, `hy`, `wg`)
/// route to the same parser as their long forms.
pub fn parse_uri(uri: &str) -> Result<ProxyNode, ParseError> {
    let uri = uri.trim();
    let scheme = uri.split("://").next().unwrap_or("");
    match scheme {
        "ss" => super::ss::explode_ss(uri),
        "ssr" => super::ssr::explode_ssr(uri),
        "vmess" => super::vmess::explode_vmess(uri),
        "vless" => super::vless::explode_vless(uri),
        "trojan" => super::trojan::explode_trojan(uri),
        "hysteria2" | "hy2" => super::hysteria2::explode_hysteria2(uri),
        "hysteria" | "hy" => super::hysteria::explode_hysteria(uri),
        "tuic" => super::tuic::explode_tuic(uri),
        "wireguard" | "wg" => super::wireguard::explode_wireguard(uri),
        "http" => super::http::explode_http(uri),
        "socks5" => super::socks::explode_socks(uri),
        _ => Err(ParseError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Splits the fragment off a link body. The fragment is the display name:
/// percent-decoded and trimmed, `None` when absent or blank.
pub(crate) fn split_fragment(content: &str) -> (&str, Option<String>) {
    match content.split_once('#') {
        Some((body, fragment)) => {
            let name = url_decode(fragment).trim().to_string();
            (body, if name.is_empty() { None } else { Some(name) })
        }
        None => (content, None),
    }
}

/// Splits a query string into key/value pairs, percent-decoding values.
/// Unknown keys are the caller's problem to ignore; with `normalize_keys`
/// set, underscores in keys become hyphens first.
pub(crate) fn query_pairs(query: &str, normalize_keys: bool) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = if normalize_keys {
                key.replace('_', "-")
            } else {
                key.to_string()
            };
            (key, url_decode(value))
        })
        .collect()
}

/// The `[auth@]host[:port][/][?query]` shape shared by the URL-style
/// schemes. Produced by [`split_authority`] after the fragment is stripped.
pub(crate) struct UriParts {
    pub auth: Option<String>,
    pub server: String,
    pub port: Option<u16>,
    pub query: String,
}

static AUTHORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(.*?)@)?(.*?)(?::(\d+))?/?(?:\?(.*))?$").unwrap());

pub(crate) fn split_authority(content: &str) -> Option<UriParts> {
    let caps = AUTHORITY_RE.captures(content)?;
    let server = caps.get(2).map_or("", |m| m.as_str()).to_string();
    if server.is_empty() {
        return None;
    }
    Some(UriParts {
        auth: caps.get(1).map(|m| m.as_str().to_string()),
        server,
        port: caps.get(3).and_then(|m| m.as_str().parse::<u16>().ok()),
        query: caps.get(4).map_or(String::new(), |m| m.as_str().to_string()),
    })
}

const IP_VERSIONS: &[&str] = &["dual", "ipv4", "ipv6", "ipv4-prefer", "ipv6-prefer"];

/// Validates an `ip-version` query value; anything outside the known set
/// falls back to `dual`.
pub(crate) fn normalize_ip_version(value: &str) -> String {
    if IP_VERSIONS.contains(&value) {
        value.to_string()
    } else {
        "dual".to_string()
    }
}

const KNOWN_CIPHERS: &[&str] = &[
    "none",
    "auto",
    "dummy",
    "aes-128-gcm",
    "aes-192-gcm",
    "aes-256-gcm",
    "chacha20-ietf-poly1305",
    "xchacha20-ietf-poly1305",
];

/// Collapses unknown cipher names to `auto`, the catch-all every client
/// accepts.
pub(crate) fn normalize_cipher(value: &str) -> String {
    if KNOWN_CIPHERS.contains(&value) {
        value.to_string()
    } else {
        "auto".to_string()
    }
}
