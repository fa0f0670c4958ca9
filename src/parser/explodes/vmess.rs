use std::collections::{BTreeMap, HashMap};

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as Json;

use crate::models::node::{GrpcOptions, H2Options, HttpOptions, VmessNode, WsOptions};
use crate::models::ProxyNode;
use crate::parser::explodes::common::{normalize_cipher, query_pairs, split_fragment};
use crate::parser::ParseError;
use crate::utils::base64::decode_base64_or_original;
use crate::utils::string::{get_if_not_blank, is_truthy, strip_quotes};

static QUANTUMULT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"=\s*vmess").unwrap());
static SHADOWROCKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^?]+?)/?\?(.*)$").unwrap());
static SHADOWROCKET_CONTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]+?):([^:]+?)@(.*):(\d+)$").unwrap());
static OBFS_HEADER_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Host:\s*([a-zA-Z0-9-.]*)").unwrap());

/// Parse a VMess link.
///
/// Three sub-formats are tried in order:
/// 1. Quantumult comma-separated `key=value` text, detected by `= vmess`
///    in the decoded payload;
/// 2. a base64 JSON object (V2rayN);
/// 3. when the JSON parse fails, the Shadowrocket form: a base64
///    `cipher:uuid@host:port` block followed by a plain query string.
pub fn explode_vmess(link: &str) -> Result<ProxyNode, ParseError> {
    let line = link
        .strip_prefix("vmess://")
        .ok_or_else(|| ParseError::malformed("vmess", "missing scheme prefix"))?;
    let (line, fragment_name) = split_fragment(line);
    let content = decode_base64_or_original(line);

    if QUANTUMULT_RE.is_match(&content) {
        return explode_quantumult(&content);
    }

    let params = match serde_json::from_str::<Json>(&content) {
        Ok(Json::Object(map)) => map,
        _ => {
            warn!("vmess payload is not JSON, trying the Shadowrocket form");
            shadowrocket_params(line)?
        }
    };

    let server = json_string(params.get("add"))
        .and_then(|s| get_if_not_blank(&s))
        .ok_or_else(|| ParseError::malformed("vmess", "missing server"))?;
    let port = json_string(params.get("port"))
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(443);

    let name = ["ps", "remarks", "remark"]
        .iter()
        .find_map(|key| json_string(params.get(*key)).and_then(|s| get_if_not_blank(&s)))
        .or(fragment_name)
        .unwrap_or_else(|| format!("VMess {}:{}", server, port));

    let tls = match params.get("tls") {
        Some(Json::String(s)) => s == "tls" || s == "1",
        Some(Json::Bool(b)) => *b,
        Some(Json::Number(n)) => n.as_u64() == Some(1),
        _ => false,
    };

    let mut node = VmessNode {
        name,
        server,
        port,
        cipher: Some(normalize_cipher(
            json_string(params.get("scy")).as_deref().unwrap_or("auto"),
        )),
        uuid: json_string(params.get("id")),
        tls: if tls { Some(true) } else { None },
        skip_cert_verify: params.get("verify_cert").map(|v| !json_truthy(v)),
        alter_id: Some(
            json_string(params.get("aid").or_else(|| params.get("alterId")))
                .and_then(|a| a.parse::<u16>().ok())
                .unwrap_or(0),
        ),
        ..Default::default()
    };
    if tls {
        node.servername = json_string(params.get("sni")).and_then(|s| get_if_not_blank(&s));
    }

    let net = json_string(params.get("net")).unwrap_or_default();
    let obfs = json_string(params.get("obfs")).unwrap_or_default();
    let type_field = json_string(params.get("type")).unwrap_or_default();

    // Network inference. Explicit websocket first, then http, grpc,
    // httpupgrade (websocket plus upgrade flags), finally h2.
    let mut httpupgrade = false;
    let network = if net == "ws" || obfs == "websocket" {
        Some("ws")
    } else if net == "http" || obfs == "http" || type_field == "http" {
        Some("http")
    } else if net == "grpc" {
        Some("grpc")
    } else if net == "httpupgrade" {
        httpupgrade = true;
        Some("ws")
    } else if net == "h2" {
        Some("h2")
    } else {
        None
    };

    if let Some(network) = network {
        // host may be a string, an array, or JSON text carrying a Host key
        let mut transport_host = params
            .get("host")
            .filter(|v| !v.is_null())
            .cloned()
            .or_else(|| params.get("obfsParam").cloned());
        if let Some(Json::String(text)) = &transport_host {
            if let Ok(Json::Object(parsed)) = serde_json::from_str::<Json>(text) {
                if let Some(host) = parsed.get("Host") {
                    transport_host = Some(host.clone());
                }
            }
        }

        let mut host = transport_host.as_ref().and_then(json_first_string);
        let mut path = params.get("path").and_then(json_first_string);
        if network == "http" {
            host = host.and_then(|h| get_if_not_blank(&h));
            path = path
                .and_then(|p| get_if_not_blank(&p))
                .or_else(|| Some("/".to_string()));
        }

        let host = host.and_then(|h| get_if_not_blank(&h));
        let path = path.and_then(|p| get_if_not_blank(&p));

        if host.is_some() || path.is_some() {
            match network {
                "grpc" => {
                    node.grpc_opts = Some(GrpcOptions {
                        grpc_service_name: path,
                    });
                }
                "ws" => {
                    node.ws_opts = Some(WsOptions {
                        path,
                        headers: host_headers(host.clone()),
                        v2ray_http_upgrade: httpupgrade.then_some(true),
                        v2ray_http_upgrade_fast_open: httpupgrade.then_some(true),
                    });
                }
                "http" => {
                    node.http_opts = Some(HttpOptions {
                        path,
                        headers: host_headers(host.clone()),
                    });
                }
                "h2" => {
                    node.h2_opts = Some(H2Options {
                        path,
                        headers: host_headers(host.clone()),
                    });
                }
                _ => {}
            }
            node.network = Some(network.to_string());

            if tls && node.servername.is_none() {
                node.servername = host;
            }
        }
    }

    Ok(ProxyNode::Vmess(node))
}

/// Rebuilds a loose parameter map from the Shadowrocket form, where the
/// credentials hide base64-encoded before the query string.
fn shadowrocket_params(line: &str) -> Result<serde_json::Map<String, Json>, ParseError> {
    let caps = SHADOWROCKET_RE
        .captures(line)
        .ok_or_else(|| ParseError::malformed("vmess", "unrecognized payload"))?;
    let decoded = decode_base64_or_original(caps.get(1).map_or("", |m| m.as_str()));

    let mut map = serde_json::Map::new();
    for (key, value) in query_pairs(caps.get(2).map_or("", |m| m.as_str()), false) {
        if value.contains(',') {
            map.insert(
                key,
                Json::Array(
                    value
                        .split(',')
                        .map(|item| Json::String(item.to_string()))
                        .collect(),
                ),
            );
        } else {
            map.insert(key, Json::String(value));
        }
    }

    if let Some(caps) = SHADOWROCKET_CONTENT_RE.captures(&decoded) {
        map.insert(
            "scy".to_string(),
            Json::String(caps.get(1).map_or("", |m| m.as_str()).to_string()),
        );
        map.insert(
            "id".to_string(),
            Json::String(caps.get(2).map_or("", |m| m.as_str()).to_string()),
        );
        map.insert(
            "add".to_string(),
            Json::String(caps.get(3).map_or("", |m| m.as_str()).to_string()),
        );
        map.insert(
            "port".to_string(),
            Json::String(caps.get(4).map_or("", |m| m.as_str()).to_string()),
        );
    }

    Ok(map)
}

/// Quantumult's comma-separated form:
/// `name = vmess, server, port, cipher, "uuid", key=value, ...`
fn explode_quantumult(content: &str) -> Result<ProxyNode, ParseError> {
    let partitions: Vec<&str> = content.split(',').map(str::trim).collect();
    if partitions.len() < 5 {
        return Err(ParseError::malformed("vmess", "truncated quantumult entry"));
    }

    let mut params: HashMap<String, String> = HashMap::new();
    for part in &partitions {
        if let Some((key, value)) = part.split_once('=') {
            params.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    let name = partitions[0]
        .split('=')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    let server = partitions[1].to_string();
    let port = partitions[2].parse::<u16>().unwrap_or(443);
    let tls = params.get("obfs").map(|o| o == "wss").unwrap_or(false);

    let mut node = VmessNode {
        name: if name.is_empty() {
            format!("VMess {}:{}", server, port)
        } else {
            name
        },
        server,
        port,
        cipher: Some(normalize_cipher(
            get_if_not_blank(partitions[3]).as_deref().unwrap_or("auto"),
        )),
        uuid: Some(strip_quotes(partitions[4]).to_string()),
        tls: if tls { Some(true) } else { None },
        udp: params.get("udp-relay").map(|v| is_truthy(v)),
        tfo: params.get("fast-open").map(|v| is_truthy(v)),
        skip_cert_verify: params.get("tls-verification").map(|v| !is_truthy(v)),
        ..Default::default()
    };

    if let Some(obfs) = params.get("obfs") {
        if obfs == "ws" || obfs == "wss" {
            node.network = Some("ws".to_string());
            let path = strip_quotes(params.get("obfs-path").map_or("\"/\"", String::as_str));
            let host = params
                .get("obfs-header")
                .and_then(|header| OBFS_HEADER_HOST_RE.captures(header))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            node.ws_opts = Some(WsOptions {
                path: Some(if path.is_empty() { "/".to_string() } else { path.to_string() }),
                headers: host_headers(host),
                ..Default::default()
            });
        } else {
            return Err(ParseError::UnsupportedObfs(obfs.clone()));
        }
    }

    Ok(ProxyNode::Vmess(node))
}

fn host_headers(host: Option<String>) -> Option<BTreeMap<String, String>> {
    host.map(|host| BTreeMap::from([("Host".to_string(), host)]))
}

fn json_string(value: Option<&Json>) -> Option<String> {
    match value? {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_first_string(value: &Json) -> Option<String> {
    match value {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Array(items) => items.first().and_then(json_first_string),
        _ => None,
    }
}

/// Truthiness the way a dynamic config file means it: false, 0, null and
/// the empty string are false, everything else is true.
fn json_truthy(value: &Json) -> bool {
    match value {
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Json::String(s) => !s.is_empty(),
        Json::Null => false,
        _ => true,
    }
}
