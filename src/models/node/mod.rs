//! One struct per protocol, combined into a tagged union.
//!
//! The `type` field of a Clash proxy mapping selects the variant, so a
//! document entry deserializes straight into the matching struct and a new
//! protocol is a new variant plus exhaustive-match fallout.

pub mod http;
pub mod hysteria;
pub mod hysteria2;
pub mod options;
pub mod passthrough;
pub mod socks;
pub mod ss;
pub mod ssr;
pub mod trojan;
pub mod tuic;
pub mod vless;
pub mod vmess;
pub mod wireguard;

use serde::{Deserialize, Serialize};

pub use http::HttpNode;
pub use hysteria::HysteriaNode;
pub use hysteria2::Hysteria2Node;
pub use options::{
    GrpcOptions, H2Options, HttpOptions, PluginOptions, RealityOptions, SsOptions, WsOptions,
};
pub use passthrough::PassthroughNode;
pub use socks::Socks5Node;
pub use ss::ShadowsocksNode;
pub use ssr::ShadowsocksRNode;
pub use trojan::TrojanNode;
pub use tuic::TuicNode;
pub use vless::VlessNode;
pub use vmess::VmessNode;
pub use wireguard::WireguardNode;

/// A single normalized proxy entry, independent of the text format it came
/// from or is going to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProxyNode {
    #[serde(rename = "ss")]
    Shadowsocks(ShadowsocksNode),
    #[serde(rename = "ssr")]
    ShadowsocksR(ShadowsocksRNode),
    #[serde(rename = "vmess")]
    Vmess(VmessNode),
    #[serde(rename = "vless")]
    Vless(VlessNode),
    #[serde(rename = "trojan")]
    Trojan(TrojanNode),
    #[serde(rename = "hysteria")]
    Hysteria(HysteriaNode),
    #[serde(rename = "hysteria2")]
    Hysteria2(Hysteria2Node),
    #[serde(rename = "tuic")]
    Tuic(TuicNode),
    #[serde(rename = "wireguard")]
    Wireguard(WireguardNode),
    #[serde(rename = "http")]
    Http(HttpNode),
    #[serde(rename = "socks5")]
    Socks5(Socks5Node),
    #[serde(rename = "direct")]
    Direct(PassthroughNode),
    #[serde(rename = "dns")]
    Dns(PassthroughNode),
    #[serde(rename = "ssh")]
    Ssh(PassthroughNode),
    #[serde(rename = "snell")]
    Snell(PassthroughNode),
}

impl ProxyNode {
    pub fn name(&self) -> &str {
        match self {
            ProxyNode::Shadowsocks(node) => &node.name,
            ProxyNode::ShadowsocksR(node) => &node.name,
            ProxyNode::Vmess(node) => &node.name,
            ProxyNode::Vless(node) => &node.name,
            ProxyNode::Trojan(node) => &node.name,
            ProxyNode::Hysteria(node) => &node.name,
            ProxyNode::Hysteria2(node) => &node.name,
            ProxyNode::Tuic(node) => &node.name,
            ProxyNode::Wireguard(node) => &node.name,
            ProxyNode::Http(node) => &node.name,
            ProxyNode::Socks5(node) => &node.name,
            ProxyNode::Direct(node)
            | ProxyNode::Dns(node)
            | ProxyNode::Ssh(node)
            | ProxyNode::Snell(node) => &node.name,
        }
    }

    pub fn server(&self) -> &str {
        match self {
            ProxyNode::Shadowsocks(node) => &node.server,
            ProxyNode::ShadowsocksR(node) => &node.server,
            ProxyNode::Vmess(node) => &node.server,
            ProxyNode::Vless(node) => &node.server,
            ProxyNode::Trojan(node) => &node.server,
            ProxyNode::Hysteria(node) => &node.server,
            ProxyNode::Hysteria2(node) => &node.server,
            ProxyNode::Tuic(node) => &node.server,
            ProxyNode::Wireguard(node) => &node.server,
            ProxyNode::Http(node) => &node.server,
            ProxyNode::Socks5(node) => &node.server,
            ProxyNode::Direct(node)
            | ProxyNode::Dns(node)
            | ProxyNode::Ssh(node)
            | ProxyNode::Snell(node) => &node.server,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            ProxyNode::Shadowsocks(node) => node.port,
            ProxyNode::ShadowsocksR(node) => node.port,
            ProxyNode::Vmess(node) => node.port,
            ProxyNode::Vless(node) => node.port,
            ProxyNode::Trojan(node) => node.port,
            ProxyNode::Hysteria(node) => node.port,
            ProxyNode::Hysteria2(node) => node.port,
            ProxyNode::Tuic(node) => node.port,
            ProxyNode::Wireguard(node) => node.port,
            ProxyNode::Http(node) => node.port,
            ProxyNode::Socks5(node) => node.port,
            ProxyNode::Direct(node)
            | ProxyNode::Dns(node)
            | ProxyNode::Ssh(node)
            | ProxyNode::Snell(node) => node.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_deserialization() {
        let node: ProxyNode = serde_yaml::from_str(
            r#"
type: ss
name: Node
server: example.com
port: 8388
cipher: aes-256-gcm
password: pass
"#,
        )
        .unwrap();
        match node {
            ProxyNode::Shadowsocks(ss) => {
                assert_eq!(ss.name, "Node");
                assert_eq!(ss.server, "example.com");
                assert_eq!(ss.port, 8388);
                assert_eq!(ss.cipher.as_deref(), Some("aes-256-gcm"));
                assert_eq!(ss.password.as_deref(), Some("pass"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let node: ProxyNode = serde_yaml::from_str(
            "type: trojan\nname: T\nserver: s.example\nport: 443\npassword: p\nbogus-key: 1\n",
        )
        .unwrap();
        assert_eq!(node.name(), "T");
        assert_eq!(node.port(), 443);
    }

    #[test]
    fn test_passthrough_type_keeps_extra_fields() {
        let node: ProxyNode = serde_yaml::from_str(
            "type: snell\nname: S\nserver: s.example\nport: 8080\npsk: secret\nversion: 4\n",
        )
        .unwrap();
        match &node {
            ProxyNode::Snell(inner) => {
                assert_eq!(inner.extra.get("psk").and_then(|v| v.as_str()), Some("secret"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
        let text = serde_yaml::to_string(&node).unwrap();
        assert!(text.contains("type: snell"));
        assert!(text.contains("psk: secret"));
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let node = ProxyNode::Hysteria2(Hysteria2Node {
            name: "H".to_string(),
            server: "h.example".to_string(),
            port: 443,
            password: Some("pw".to_string()),
            ..Default::default()
        });
        let text = serde_yaml::to_string(&node).unwrap();
        assert!(text.contains("type: hysteria2"));
        assert!(!text.contains("sni"));
        assert!(!text.contains("obfs"));
    }
}
