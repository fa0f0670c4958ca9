use crate::models::node::WireguardNode;
use crate::models::ProxyNode;
use crate::parser::explodes::common::{query_pairs, split_authority, split_fragment};
use crate::parser::ParseError;
use crate::utils::net::{is_ipv4, is_ipv6};
use crate::utils::string::{get_if_not_blank, is_truthy};
use crate::utils::url::url_decode;

/// Parse a WireGuard link: `wireguard://private-key@host:port?params#name`
/// (alias `wg://`).
pub fn explode_wireguard(link: &str) -> Result<ProxyNode, ParseError> {
    let content = link
        .strip_prefix("wireguard://")
        .or_else(|| link.strip_prefix("wg://"))
        .ok_or_else(|| ParseError::malformed("wireguard", "missing scheme prefix"))?;
    let (content, fragment_name) = split_fragment(content);

    let parts = split_authority(content)
        .ok_or_else(|| ParseError::malformed("wireguard", "missing authority"))?;
    let server = parts.server;
    let port = parts.port.unwrap_or(443);

    let mut node = WireguardNode {
        name: fragment_name.unwrap_or_else(|| format!("WireGuard {}:{}", server, port)),
        server,
        port,
        private_key: parts.auth.map(|key| url_decode(&key)),
        udp: Some(true),
        ..Default::default()
    };

    for (key, value) in query_pairs(&parts.query, true) {
        match key.as_str() {
            // local addresses, classified by family after stripping prefix
            // length and IPv6 brackets
            "address" | "ip" => {
                for item in value.split(',') {
                    let ip = item.trim();
                    let ip = ip.split_once('/').map_or(ip, |(addr, _)| addr);
                    let ip = ip.trim_start_matches('[').trim_end_matches(']');
                    if is_ipv4(ip) {
                        node.ip = Some(ip.to_string());
                    } else if is_ipv6(ip) {
                        node.ipv6 = Some(ip.to_string());
                    }
                }
            }
            "publickey" => node.public_key = get_if_not_blank(&value),
            "allowed-ips" => {
                node.allowed_ips = get_if_not_blank(&value)
                    .map(|ips| ips.split(',').map(str::to_string).collect());
            }
            "pre-shared-key" => node.pre_shared_key = get_if_not_blank(&value),
            "reserved" => {
                let parsed: Vec<u32> = value
                    .split(',')
                    .filter_map(|item| item.trim().parse::<u32>().ok())
                    .collect();
                if parsed.len() == 3 {
                    node.reserved = Some(parsed);
                }
            }
            "udp" => node.udp = Some(is_truthy(&value)),
            "mtu" => node.mtu = value.trim().parse::<u32>().ok(),
            "dialer-proxy" => node.dialer_proxy = get_if_not_blank(&value),
            "remote-dns-resolve" => {
                if is_truthy(&value) {
                    node.remote_dns_resolve = Some(true);
                }
            }
            "dns" => {
                node.dns = get_if_not_blank(&value)
                    .map(|dns| dns.split(',').map(str::to_string).collect());
            }
            _ => {}
        }
    }

    Ok(ProxyNode::Wireguard(node))
}
