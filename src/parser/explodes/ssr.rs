use crate::models::node::ShadowsocksRNode;
use crate::models::ProxyNode;
use crate::parser::explodes::common::{normalize_cipher, query_pairs};
use crate::parser::ParseError;
use crate::utils::base64::decode_base64_or_original;
use crate::utils::string::get_if_not_blank;

/// Parse a ShadowsocksR link.
///
/// The whole payload after the scheme is one base64 blob of positional
/// colon-separated fields:
/// `server:port:protocol:method:obfs:base64(password)/?query`, where the
/// query carries base64-encoded `remarks`, `protoparam` and `obfsparam`.
pub fn explode_ssr(link: &str) -> Result<ProxyNode, ParseError> {
    let content = link
        .strip_prefix("ssr://")
        .ok_or_else(|| ParseError::malformed("ssr", "missing scheme prefix"))?;
    let payload = decode_base64_or_original(content);

    // The server may be an IPv6 literal full of colons, so anchor the field
    // split on the protocol name instead of counting separators.
    let split_idx = payload
        .find(":origin")
        .or_else(|| payload.find(":auth_"))
        .ok_or_else(|| ParseError::malformed("ssr", "unrecognized protocol field"))?;

    let server_and_port = &payload[..split_idx];
    let (server, port_part) = server_and_port
        .rsplit_once(':')
        .ok_or_else(|| ParseError::malformed("ssr", "missing port"))?;
    let port: u16 = port_part
        .parse()
        .map_err(|_| ParseError::malformed("ssr", "invalid port"))?;

    let rest = &payload[split_idx + 1..];
    let main = rest.split("/?").next().unwrap_or("");
    let fields: Vec<&str> = main.split(':').collect();
    if fields.len() < 4 {
        return Err(ParseError::malformed("ssr", "missing positional fields"));
    }

    let mut node = ShadowsocksRNode {
        name: String::new(),
        server: server.to_string(),
        port,
        protocol: Some(fields[0].to_string()),
        cipher: Some(normalize_cipher(fields[1])),
        obfs: Some(fields[2].to_string()),
        password: Some(decode_base64_or_original(fields[3])),
        ..Default::default()
    };

    if let Some((_, query)) = rest.split_once("/?") {
        for (key, value) in query_pairs(query, false) {
            match key.as_str() {
                "remarks" => {
                    node.name = decode_base64_or_original(&value).trim().to_string();
                }
                "protoparam" => {
                    node.protocol_param =
                        get_if_not_blank(&strip_whitespace(&decode_base64_or_original(&value)));
                }
                "obfsparam" => {
                    node.obfs_param =
                        get_if_not_blank(&strip_whitespace(&decode_base64_or_original(&value)));
                }
                _ => {}
            }
        }
    }

    if node.name.is_empty() {
        node.name = format!("SSR {}:{}", node.server, node.port);
    }

    Ok(ProxyNode::ShadowsocksR(node))
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
