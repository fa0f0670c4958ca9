use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::models::node::{GrpcOptions, H2Options, HttpOptions, RealityOptions, VlessNode, WsOptions};
use crate::models::ProxyNode;
use crate::parser::explodes::common::{query_pairs, split_authority, split_fragment};
use crate::parser::ParseError;
use crate::utils::base64::decode_base64_or_original;
use crate::utils::string::{get_if_not_blank, is_truthy};
use crate::utils::url::url_decode;

/// Parse a VLESS link: `vless://uuid@host:port?params#name`, or the
/// Shadowrocket variant where everything before the query is base64 and the
/// uuid carries a `cipher:` prefix.
pub fn explode_vless(link: &str) -> Result<ProxyNode, ParseError> {
    let content = link
        .strip_prefix("vless://")
        .ok_or_else(|| ParseError::malformed("vless", "missing scheme prefix"))?;
    let (content, fragment_name) = split_fragment(content);

    let mut shadowrocket = false;
    let content = if content.contains('@') {
        content.to_string()
    } else {
        shadowrocket = true;
        match content.split_once('?') {
            Some((body, query)) => {
                format!("{}?{}", decode_base64_or_original(body), query)
            }
            None => decode_base64_or_original(content),
        }
    };

    let parts = split_authority(&content)
        .ok_or_else(|| ParseError::malformed("vless", "missing authority"))?;
    let auth = parts
        .auth
        .ok_or_else(|| ParseError::malformed("vless", "missing uuid"))?;
    let uuid = if shadowrocket {
        // the Shadowrocket form prefixes the uuid with a cipher name
        auth.split_once(':').map_or(auth.clone(), |(_, id)| id.to_string())
    } else {
        auth
    };
    let server = parts.server;
    let port = parts.port.unwrap_or(443);

    let params: HashMap<String, String> = query_pairs(&parts.query, false).into_iter().collect();
    let param = |key: &str| params.get(key).and_then(|v| get_if_not_blank(v));

    let name = fragment_name
        .or_else(|| param("remarks"))
        .or_else(|| param("remark"))
        .unwrap_or_else(|| format!("VLESS {}:{}", server, port));

    let mut security = param("security");
    let mut tls = security.as_deref().map_or(false, |s| s != "none");
    if shadowrocket && params.get("tls").map_or(false, |v| is_truthy(v)) {
        tls = true;
        security.get_or_insert_with(|| "reality".to_string());
    }

    let mut node = VlessNode {
        name,
        server,
        port,
        uuid: Some(url_decode(&uuid)),
        tls: if tls { Some(true) } else { None },
        servername: param("sni").or_else(|| param("peer")),
        flow: param("flow").map(|_| "xtls-rprx-vision".to_string()),
        client_fingerprint: param("fp"),
        alpn: param("alpn").map(|alpn| {
            alpn.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }),
        skip_cert_verify: params
            .get("allowInsecure")
            .filter(|v| is_truthy(v))
            .map(|_| true),
        ..Default::default()
    };

    if security.as_deref() == Some("reality") {
        let opts = RealityOptions {
            public_key: param("pbk"),
            short_id: param("sid"),
            spider_x: param("spx"),
            mldsa65_verify: param("pqv"),
            ech: param("ech"),
        };
        if !opts.is_empty() {
            node.reality_opts = Some(opts);
        }
    }

    let mut httpupgrade = false;
    let network = if param("headerType").as_deref() == Some("http") {
        Some("http")
    } else {
        match params.get("type").map(String::as_str) {
            // "sw" is Shadowrocket's name for websocket
            Some("ws") | Some("websocket") | Some("sw") => Some("ws"),
            Some("httpupgrade") => {
                httpupgrade = true;
                Some("ws")
            }
            Some("http") => Some("http"),
            Some("grpc") => Some("grpc"),
            Some("h2") => Some("h2"),
            _ => None,
        }
    };

    if let Some(network) = network {
        let headers = transport_headers(&params);
        let path = param("path");
        let host = headers
            .as_ref()
            .and_then(|headers| headers.get("Host").cloned());

        match network {
            "grpc" => {
                node.grpc_opts = Some(GrpcOptions {
                    grpc_service_name: param("serviceName").or(path),
                });
            }
            "ws" => {
                node.ws_opts = Some(WsOptions {
                    path,
                    headers,
                    v2ray_http_upgrade: httpupgrade.then_some(true),
                    v2ray_http_upgrade_fast_open: httpupgrade.then_some(true),
                });
            }
            "http" => {
                node.http_opts = Some(HttpOptions { path, headers });
            }
            "h2" => {
                node.h2_opts = Some(H2Options { path, headers });
            }
            _ => {}
        }
        node.network = Some(network.to_string());

        if tls && node.servername.is_none() {
            node.servername = host;
        }
    }

    Ok(ProxyNode::Vless(node))
}

/// The `host` parameter names the Host header; `obfsParam` may carry a whole
/// JSON header map instead.
fn transport_headers(params: &HashMap<String, String>) -> Option<BTreeMap<String, String>> {
    if let Some(obfs_param) = params.get("obfsParam").and_then(|v| get_if_not_blank(v)) {
        match serde_json::from_str::<serde_json::Value>(&obfs_param) {
            Ok(serde_json::Value::Object(map)) => {
                return Some(
                    map.into_iter()
                        .filter_map(|(key, value)| {
                            value.as_str().map(|v| (key, v.to_string()))
                        })
                        .collect(),
                );
            }
            _ => {
                warn!("vless obfsParam is not a JSON header map, using it as Host");
                return Some(BTreeMap::from([("Host".to_string(), obfs_param)]));
            }
        }
    }
    params
        .get("host")
        .and_then(|v| get_if_not_blank(v))
        .map(|host| BTreeMap::from([("Host".to_string(), host)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_vless(link: &str) -> VlessNode {
        match explode_vless(link).unwrap() {
            ProxyNode::Vless(node) => node,
            other => panic!("wrong variant: {:?}", other),
        }
    }

    const UUID: &str = "11111111-2222-3333-4444-555555555555";

    #[test]
    fn test_reality_link() {
        let node = parse_vless(&format!(
            "vless://{}@example.com:443?security=reality&sni=sni.example.com&pbk=PUBKEY&sid=0123&flow=xtls-rprx-vision&fp=chrome&type=tcp#VLESS%20Node",
            UUID
        ));
        assert_eq!(node.name, "VLESS Node");
        assert_eq!(node.uuid.as_deref(), Some(UUID));
        assert_eq!(node.tls, Some(true));
        assert_eq!(node.servername.as_deref(), Some("sni.example.com"));
        assert_eq!(node.flow.as_deref(), Some("xtls-rprx-vision"));
        assert_eq!(node.client_fingerprint.as_deref(), Some("chrome"));
        assert_eq!(node.network, None);
        let reality = node.reality_opts.unwrap();
        assert_eq!(reality.public_key.as_deref(), Some("PUBKEY"));
        assert_eq!(reality.short_id.as_deref(), Some("0123"));
    }

    #[test]
    fn test_ws_transport_and_servername_fallback() {
        let node = parse_vless(&format!(
            "vless://{}@example.com:443?security=tls&type=ws&host=cdn.example.com&path=%2Fws",
            UUID
        ));
        assert_eq!(node.network.as_deref(), Some("ws"));
        let ws = node.ws_opts.unwrap();
        assert_eq!(ws.path.as_deref(), Some("/ws"));
        assert_eq!(
            ws.headers.unwrap().get("Host").map(String::as_str),
            Some("cdn.example.com")
        );
        assert_eq!(ws.v2ray_http_upgrade, None);
        assert_eq!(node.servername.as_deref(), Some("cdn.example.com"));
    }

    #[test]
    fn test_httpupgrade_sets_ws_flags() {
        let node = parse_vless(&format!(
            "vless://{}@example.com:8443?type=httpupgrade&path=%2Fup",
            UUID
        ));
        assert_eq!(node.network.as_deref(), Some("ws"));
        let ws = node.ws_opts.unwrap();
        assert_eq!(ws.v2ray_http_upgrade, Some(true));
        assert_eq!(ws.v2ray_http_upgrade_fast_open, Some(true));
    }

    #[test]
    fn test_grpc_service_name() {
        let node = parse_vless(&format!(
            "vless://{}@example.com:443?security=tls&sni=g.example&type=grpc&serviceName=TunService",
            UUID
        ));
        assert_eq!(node.network.as_deref(), Some("grpc"));
        assert_eq!(
            node.grpc_opts.unwrap().grpc_service_name.as_deref(),
            Some("TunService")
        );
    }

    #[test]
    fn test_shadowrocket_base64_form() {
        // base64("auto:uuid@example.com:443") with a plain query
        let node = parse_vless(
            "vless://YXV0bzoxMTExMTExMS0yMjIyLTMzMzMtNDQ0NC01NTU1NTU1NTU1NTVAZXhhbXBsZS5jb206NDQz?remarks=SR%20VLESS&tls=1&pbk=PUBKEY",
        );
        assert_eq!(node.name, "SR VLESS");
        assert_eq!(node.uuid.as_deref(), Some(UUID));
        assert_eq!(node.tls, Some(true));
        assert_eq!(
            node.reality_opts.unwrap().public_key.as_deref(),
            Some("PUBKEY")
        );
    }

    #[test]
    fn test_port_defaults_to_443() {
        let node = parse_vless(&format!("vless://{}@example.com?security=none", UUID));
        assert_eq!(node.port, 443);
        assert_eq!(node.tls, None);
        assert_eq!(node.name, "VLESS example.com:443");
    }
}
