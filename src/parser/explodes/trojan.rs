use std::collections::BTreeMap;

use crate::models::node::{GrpcOptions, SsOptions, TrojanNode, WsOptions};
use crate::models::ProxyNode;
use crate::parser::explodes::common::{query_pairs, split_authority, split_fragment};
use crate::parser::ParseError;
use crate::utils::string::{get_if_not_blank, is_truthy};
use crate::utils::url::url_decode;

/// Parse a Trojan link: `trojan://password@host:port?params#name`.
pub fn explode_trojan(link: &str) -> Result<ProxyNode, ParseError> {
    let content = link
        .strip_prefix("trojan://")
        .ok_or_else(|| ParseError::malformed("trojan", "missing scheme prefix"))?;
    let (content, fragment_name) = split_fragment(content);

    let parts = split_authority(content)
        .ok_or_else(|| ParseError::malformed("trojan", "missing authority"))?;
    let password = parts
        .auth
        .ok_or_else(|| ParseError::malformed("trojan", "missing password"))?;
    let server = parts.server;
    let port = parts.port.unwrap_or(443);

    let mut node = TrojanNode {
        name: fragment_name.unwrap_or_else(|| format!("Trojan {}:{}", server, port)),
        server,
        port,
        password: Some(url_decode(&password)),
        ..Default::default()
    };

    let mut host: Option<String> = None;
    let mut path: Option<String> = None;
    for (key, value) in query_pairs(&parts.query, false) {
        match key.as_str() {
            "type" => {
                if matches!(value.as_str(), "ws" | "h2" | "grpc") {
                    node.network = Some(value);
                }
            }
            "host" => host = get_if_not_blank(&value),
            "path" => path = get_if_not_blank(&value),
            "sni" => node.sni = get_if_not_blank(&value),
            "alpn" => {
                node.alpn = get_if_not_blank(&value).map(|alpn| {
                    alpn.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                });
            }
            "skip-cert-verify" => {
                if is_truthy(&value) {
                    node.skip_cert_verify = Some(true);
                }
            }
            "fingerprint" | "fp" => node.fingerprint = get_if_not_blank(&value),
            "client-fingerprint" => node.client_fingerprint = get_if_not_blank(&value),
            // Shadowsocks-over-Trojan: encryption=ss;method;password
            "encryption" => {
                let fields: Vec<&str> = value.split(';').collect();
                if fields.len() == 3 {
                    node.ss_opts = Some(SsOptions {
                        enabled: Some(true),
                        method: Some(fields[1].to_string()),
                        password: Some(fields[2].to_string()),
                    });
                }
            }
            _ => {}
        }
    }

    match node.network.as_deref() {
        Some("ws") => {
            if host.is_some() || path.is_some() {
                node.ws_opts = Some(WsOptions {
                    path,
                    headers: host.map(|host| BTreeMap::from([("Host".to_string(), host)])),
                    ..Default::default()
                });
            }
        }
        Some("grpc") => {
            node.grpc_opts = Some(GrpcOptions {
                grpc_service_name: path,
            });
        }
        _ => {}
    }

    Ok(ProxyNode::Trojan(node))
}
