use url::Url;

use crate::models::node::Hysteria2Node;
use crate::models::ProxyNode;
use crate::parser::explodes::common::split_fragment;
use crate::parser::ParseError;
use crate::utils::string::{get_if_not_blank, is_truthy};
use crate::utils::url::url_decode;

/// Parse a Hysteria2 link: `hysteria2://password@host:port?params#name`
/// (alias `hy2://`).
pub fn explode_hysteria2(link: &str) -> Result<ProxyNode, ParseError> {
    let content = link
        .strip_prefix("hysteria2://")
        .or_else(|| link.strip_prefix("hy2://"))
        .ok_or_else(|| ParseError::malformed("hysteria2", "missing scheme prefix"))?;
    let (content, fragment_name) = split_fragment(content);

    let url = Url::parse(&format!("hysteria2://{}", content))
        .map_err(|_| ParseError::malformed("hysteria2", "invalid URL"))?;
    let server = url
        .host_str()
        .ok_or_else(|| ParseError::malformed("hysteria2", "missing server"))?
        .to_string();
    let port = url.port().unwrap_or(443);

    let mut node = Hysteria2Node {
        name: fragment_name.unwrap_or_else(|| format!("Hysteria2 {}:{}", server, port)),
        server,
        port,
        password: get_if_not_blank(&url_decode(url.username())),
        ..Default::default()
    };

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "sni" | "peer" => {
                if node.sni.is_none() {
                    node.sni = get_if_not_blank(&value);
                }
            }
            "obfs" => node.obfs = get_if_not_blank(&value),
            "obfs-password" => node.obfs_password = get_if_not_blank(&value),
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
            _ => {}
        }
    }

    Ok(ProxyNode::Hysteria2(node))
}
