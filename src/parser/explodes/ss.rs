use std::collections::HashMap;

use crate::models::node::{PluginOptions, ShadowsocksNode};
use crate::models::ProxyNode;
use crate::parser::explodes::common::{normalize_cipher, query_pairs, split_fragment};
use crate::parser::ParseError;
use crate::utils::base64::decode_base64_or_original;
use crate::utils::string::{get_if_not_blank, is_truthy};
use crate::utils::url::url_decode;

/// Parse a Shadowsocks link.
///
/// Handles both SIP002 (`ss://base64(method:password)@host:port`) and the
/// legacy form where everything after the scheme is one base64 blob, plus
/// the SIP003 plugin directive and the `uot`/`tfo` query flags.
///
/// Unlike the URL-style schemes, a Shadowsocks link without a parseable
/// port fails outright: the port sits in a mandatory slot of the payload,
/// so its absence means the link is corrupt rather than relying on a
/// default.
pub fn explode_ss(link: &str) -> Result<ProxyNode, ParseError> {
    let content = link
        .strip_prefix("ss://")
        .ok_or_else(|| ParseError::malformed("ss", "missing scheme prefix"))?;
    let (content, name) = split_fragment(content);
    let mut content = content.to_string();

    let mut query = String::new();
    if let Some(pos) = content.find('?') {
        query = content[pos + 1..].to_string();
        content.truncate(pos);
    }
    if content.ends_with('/') {
        content.pop();
    }

    if !content.contains('@') {
        // legacy form: the whole body is one base64 blob
        content = decode_base64_or_original(&content);
    }

    let (user_info, server_part) = content
        .split_once('@')
        .ok_or_else(|| ParseError::malformed("ss", "missing credential block"))?;
    let user_info = decode_base64_or_original(user_info);

    let (server, port_part) = server_part
        .rsplit_once(':')
        .ok_or_else(|| ParseError::malformed("ss", "missing port"))?;
    let digits: String = port_part
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let port: u16 = digits
        .parse()
        .map_err(|_| ParseError::malformed("ss", "invalid port"))?;

    let (cipher_raw, password_raw) = user_info
        .split_once(':')
        .ok_or_else(|| ParseError::malformed("ss", "missing cipher in credentials"))?;
    let cipher = normalize_cipher(cipher_raw);
    let password = url_decode(password_raw);

    let mut node = ShadowsocksNode {
        name: name.unwrap_or_else(|| format!("SS {}:{}", server, port)),
        server: server.to_string(),
        port,
        cipher: Some(cipher),
        password: Some(password),
        ..Default::default()
    };

    for (key, value) in query_pairs(&query, false) {
        match key.as_str() {
            "plugin" => {
                let (plugin, opts) = parse_plugin(&value)?;
                node.plugin = Some(plugin);
                node.plugin_opts = Some(opts);
            }
            // v2ray-plugin options shipped as base64 JSON (legacy writers)
            "v2ray-plugin" => {
                let decoded = decode_base64_or_original(&value);
                let opts: PluginOptions = serde_json::from_str(&decoded)
                    .map_err(|_| ParseError::malformed("ss", "invalid v2ray-plugin options"))?;
                node.plugin = Some("v2ray-plugin".to_string());
                node.plugin_opts = Some(opts);
            }
            "uot" => {
                if is_truthy(&value) {
                    node.udp_over_tcp = Some(true);
                }
            }
            "tfo" => {
                if is_truthy(&value) {
                    node.tfo = Some(true);
                }
            }
            _ => {}
        }
    }

    Ok(ProxyNode::Shadowsocks(node))
}

/// Parses a SIP003 plugin directive, a `;`-joined key=value list whose
/// first item names the plugin. Value-less items (like `tls`) are flags.
fn parse_plugin(spec: &str) -> Result<(String, PluginOptions), ParseError> {
    let mut items = spec.split(';');
    let plugin_name = items.next().unwrap_or("");

    let mut params: HashMap<&str, Option<&str>> = HashMap::new();
    for item in items {
        match item.split_once('=') {
            Some((key, value)) => params.insert(key, Some(value)),
            None if !item.is_empty() => params.insert(item, None),
            None => None,
        };
    }

    let flag = |key: &str| params.contains_key(key);
    let value = |key: &str| params.get(key).copied().flatten().and_then(get_if_not_blank);

    match plugin_name {
        "obfs-local" | "simple-obfs" => Ok((
            "obfs".to_string(),
            PluginOptions {
                mode: params.get("obfs").copied().flatten().map(str::to_string),
                host: value("obfs-host"),
                ..Default::default()
            },
        )),
        "v2ray-plugin" => Ok((
            "v2ray-plugin".to_string(),
            PluginOptions {
                mode: Some("websocket".to_string()),
                host: value("obfs-host"),
                path: value("path"),
                tls: if flag("tls") { Some(true) } else { None },
            },
        )),
        other => Err(ParseError::UnsupportedPlugin(other.to_string())),
    }
}
