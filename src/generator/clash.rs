//! Renders proxy entries as YAML list items.

use crate::models::ProxyNode;
use crate::utils::yaml::compact_value;

/// Renders one entry as a `- ` YAML list item with two-space continuation
/// indent. Absent and empty fields are pruned first, so the output carries
/// only what the entry actually specifies. Returns `None` if the entry
/// compacts away entirely or fails to serialize, which no well-formed entry
/// does.
pub fn generate_clash_entry(node: &ProxyNode) -> Option<String> {
    let value = serde_yaml::to_value(node).ok()?;
    let value = compact_value(value)?;
    let text = serde_yaml::to_string(&value).ok()?;

    let mut lines = text.trim_end().lines();
    let first = lines.next()?;
    let mut entry = format!("- {}", first);
    for line in lines {
        entry.push_str("\n  ");
        entry.push_str(line);
    }
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::node::ShadowsocksNode;

    #[test]
    fn test_entry_shape() {
        let node = ProxyNode::Shadowsocks(ShadowsocksNode {
            name: "Node".to_string(),
            server: "example.com".to_string(),
            port: 8388,
            cipher: Some("aes-256-gcm".to_string()),
            password: Some("pass".to_string()),
            ..Default::default()
        });
        let entry = generate_clash_entry(&node).unwrap();
        assert!(entry.starts_with("- type: ss\n"));
        for line in entry.lines().skip(1) {
            assert!(line.starts_with("  "), "unindented line: {:?}", line);
        }
        assert!(entry.contains("\n  name: Node"));
        assert!(entry.contains("\n  server: example.com"));
        assert!(entry.contains("\n  port: 8388"));
        assert!(entry.contains("\n  cipher: aes-256-gcm"));
    }

    #[test]
    fn test_absent_fields_pruned() {
        let node = ProxyNode::Shadowsocks(ShadowsocksNode {
            name: "Node".to_string(),
            server: "example.com".to_string(),
            port: 8388,
            ..Default::default()
        });
        let entry = generate_clash_entry(&node).unwrap();
        assert!(!entry.contains("plugin"));
        assert!(!entry.contains("password"));
    }

    #[test]
    fn test_entry_parses_back() {
        let node = ProxyNode::Shadowsocks(ShadowsocksNode {
            name: "Node".to_string(),
            server: "example.com".to_string(),
            port: 8388,
            cipher: Some("aes-256-gcm".to_string()),
            password: Some("pass".to_string()),
            udp_over_tcp: Some(true),
            ..Default::default()
        });
        let entry = generate_clash_entry(&node).unwrap();
        let document = format!("proxies:\n{}\n", indent_entry(&entry));
        let value: serde_yaml::Value = serde_yaml::from_str(&document).unwrap();
        let list = value.get("proxies").unwrap().as_sequence().unwrap();
        let reparsed: ProxyNode = serde_yaml::from_value(list[0].clone()).unwrap();
        assert_eq!(reparsed, node);
    }

    fn indent_entry(entry: &str) -> String {
        entry
            .lines()
            .map(|line| format!("  {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
