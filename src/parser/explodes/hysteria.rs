use crate::models::node::HysteriaNode;
use crate::models::ProxyNode;
use crate::parser::explodes::common::{query_pairs, split_authority, split_fragment};
use crate::parser::ParseError;
use crate::utils::string::{get_if_not_blank, is_truthy};

/// Parse a Hysteria v1 link: `hysteria://host:port?params#name` (alias
/// `hy://`). Query keys come in both underscore and hyphen spellings.
pub fn explode_hysteria(link: &str) -> Result<ProxyNode, ParseError> {
    let content = link
        .strip_prefix("hysteria://")
        .or_else(|| link.strip_prefix("hy://"))
        .ok_or_else(|| ParseError::malformed("hysteria", "missing scheme prefix"))?;
    let (content, fragment_name) = split_fragment(content);

    let parts = split_authority(content)
        .ok_or_else(|| ParseError::malformed("hysteria", "missing authority"))?;
    let server = parts.server;
    let port = parts.port.unwrap_or(443);

    let mut node = HysteriaNode {
        name: fragment_name.unwrap_or_else(|| format!("Hysteria {}:{}", server, port)),
        server,
        port,
        ..Default::default()
    };

    let mut peer: Option<String> = None;
    for (key, value) in query_pairs(&parts.query, true) {
        match key.as_str() {
            "auth" => node.auth_str = get_if_not_blank(&value),
            "mport" => node.ports = get_if_not_blank(&value),
            "obfs" | "obfsParam" => node.obfs = get_if_not_blank(&value),
            "protocol" => node.protocol = get_if_not_blank(&value),
            "upmbps" => node.up = get_if_not_blank(&value),
            "downmbps" => node.down = get_if_not_blank(&value),
            "sni" => node.sni = get_if_not_blank(&value),
            "peer" => peer = get_if_not_blank(&value),
            "insecure" => {
                if is_truthy(&value) {
                    node.skip_cert_verify = Some(true);
                }
            }
            "alpn" => {
                node.alpn = get_if_not_blank(&value).map(|alpn| {
                    alpn.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                });
            }
            "fast-open" => {
                if is_truthy(&value) {
                    node.fast_open = Some(true);
                }
            }
            "recv-window-conn" => node.recv_window_conn = value.parse::<u32>().ok(),
            "recv-window" => node.recv_window = value.parse::<u32>().ok(),
            "ca" => node.ca = get_if_not_blank(&value),
            "ca-str" => node.ca_str = get_if_not_blank(&value),
            "disable-mtu-discovery" => {
                if is_truthy(&value) {
                    node.disable_mtu_discovery = Some(true);
                }
            }
            "fingerprint" => node.fingerprint = get_if_not_blank(&value),
            _ => {}
        }
    }

    if node.sni.is_none() {
        node.sni = peer;
    }
    if node.protocol.is_none() {
        node.protocol = Some("udp".to_string());
    }

    Ok(ProxyNode::Hysteria(node))
}
