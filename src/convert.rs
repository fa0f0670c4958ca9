//! The two batch entry points: link list to configuration document and
//! configuration document to link list.
//!
//! Both directions are total: per-entry failures drop the entry, and a batch
//! with nothing usable reports failure through [`ConvertResult`] with a
//! `#`-prefixed comment line instead of an error, so the output is always
//! safe to paste into a text field.

use log::debug;

use crate::generator::{generate_clash_entry, generate_uri};
use crate::models::ProxyNode;
use crate::parser::{extract_proxies, parse_uri};

/// How `link_to_clash` wraps the generated entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Under a `proxies:` key, the standard configuration shape.
    #[default]
    Proxies,
    /// Under a `payload:` key, the proxy-provider shape.
    Payload,
    /// The bare entry list with no wrapping key.
    None,
}

/// Outcome of a batch conversion. `data` holds the converted text on
/// success and a `#` comment describing the problem on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertResult {
    pub success: bool,
    pub data: String,
}

impl ConvertResult {
    fn ok(data: String) -> Self {
        ConvertResult {
            success: true,
            data,
        }
    }

    fn fail(message: &str) -> Self {
        ConvertResult {
            success: false,
            data: message.to_string(),
        }
    }
}

/// Converts share links to a configuration document. Blank lines and links
/// that fail to parse are skipped; the batch fails only when nothing
/// converts.
pub fn link_to_clash<I>(links: I, mode: OutputMode) -> ConvertResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut entries: Vec<String> = Vec::new();
    for link in links {
        let link = link.as_ref().trim();
        if link.is_empty() {
            continue;
        }
        match parse_uri(link) {
            Ok(node) => {
                if let Some(entry) = generate_clash_entry(&node) {
                    entries.push(entry);
                }
            }
            Err(e) => debug!("skipping link {:?}: {}", link, e),
        }
    }

    if entries.is_empty() {
        return ConvertResult::fail("# no valid proxy entries found (check the link format)");
    }

    let content = entries.join("\n");
    match mode {
        OutputMode::Proxies => ConvertResult::ok(format!("proxies:\n{}", content)),
        OutputMode::Payload => ConvertResult::ok(format!("payload:\n{}", content)),
        OutputMode::None => ConvertResult::ok(content),
    }
}

/// Converts a configuration document to share links, one per line, in
/// document order. Entries of a type without a link form, or too mangled to
/// deserialize, are skipped.
pub fn clash_to_link(yaml_text: &str) -> ConvertResult {
    let document: serde_yaml::Value = match serde_yaml::from_str(yaml_text) {
        Ok(document) => document,
        Err(e) => return ConvertResult::fail(&format!("# YAML parse error: {}", e)),
    };

    let entries = extract_proxies(&document);
    if entries.is_empty() {
        return ConvertResult::fail(
            "# no proxy entries detected (supported: proxies / payload / top-level list)",
        );
    }

    let links: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| match serde_yaml::from_value::<ProxyNode>(entry) {
            Ok(node) => generate_uri(&node),
            Err(e) => {
                debug!("skipping entry: {}", e);
                None
            }
        })
        .collect();

    if links.is_empty() {
        return ConvertResult::fail("# no convertible proxy entries found");
    }
    ConvertResult::ok(links.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SS_LINK: &str = "ss://YWVzLTI1Ni1nY206cGFzcw==@example.com:8388#MyNode";

    #[test]
    fn test_link_to_clash_proxies_mode() {
        let result = link_to_clash([SS_LINK], OutputMode::Proxies);
        assert!(result.success);
        assert!(result.data.starts_with("proxies:\n- type: ss\n"));
        assert!(result.data.contains("name: MyNode"));
    }

    #[test]
    fn test_link_to_clash_payload_and_none_modes() {
        let result = link_to_clash([SS_LINK], OutputMode::Payload);
        assert!(result.data.starts_with("payload:\n- "));

        let result = link_to_clash([SS_LINK], OutputMode::None);
        assert!(result.data.starts_with("- "));
    }

    #[test]
    fn test_link_to_clash_skips_bad_lines() {
        let result = link_to_clash(
            ["", "   ", "unknown://x", SS_LINK, "ss://%%%"],
            OutputMode::Proxies,
        );
        assert!(result.success);
        assert_eq!(result.data.matches("- type:").count(), 1);
    }

    #[test]
    fn test_link_to_clash_all_bad_fails() {
        let result = link_to_clash(["unknown://x", "not a link"], OutputMode::Proxies);
        assert!(!result.success);
        assert!(result.data.starts_with('#'));
    }

    #[test]
    fn test_clash_to_link_basic() {
        let result = clash_to_link(
            "proxies:\n  - name: A\n    type: trojan\n    server: t.example\n    port: 443\n    password: pw\n",
        );
        assert!(result.success);
        assert!(result.data.starts_with("trojan://pw@t.example:443"));
    }

    #[test]
    fn test_clash_to_link_invalid_yaml() {
        let result = clash_to_link("proxies: [unclosed");
        assert!(!result.success);
        assert!(result.data.starts_with("# YAML parse error:"));
    }

    #[test]
    fn test_clash_to_link_no_entries() {
        let result = clash_to_link("rules:\n  - MATCH,DIRECT\n");
        assert!(!result.success);
        assert!(result.data.contains("no proxy entries detected"));
    }

    #[test]
    fn test_clash_to_link_only_passthrough_entries() {
        let result = clash_to_link(
            "proxies:\n  - {name: D, type: direct, server: d.example, port: 1}\n",
        );
        assert!(!result.success);
        assert!(result.data.contains("no convertible proxy entries"));
    }

    #[test]
    fn test_document_roundtrip() {
        let forward = link_to_clash([SS_LINK], OutputMode::Proxies);
        assert!(forward.success);
        let backward = clash_to_link(&forward.data);
        assert!(backward.success);
        let reparsed = parse_uri(&backward.data).unwrap();
        assert_eq!(parse_uri(SS_LINK).unwrap(), reparsed);
    }
}
