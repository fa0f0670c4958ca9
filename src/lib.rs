//! Bidirectional converter between proxy share links and Clash-style
//! proxy-list YAML.
//!
//! The forward direction parses `ss://`, `ssr://`, `vmess://`, `vless://`,
//! `trojan://`, `hysteria://`, `hysteria2://`, `tuic://`, `wireguard://`,
//! `http://` and `socks5://` links into a normalized entry model and renders
//! them as a YAML proxy list. The reverse direction digs the proxy list out
//! of a configuration document and regenerates share links.

pub mod convert;
pub mod generator;
pub mod models;
pub mod parser;
pub mod utils;

pub use convert::{clash_to_link, link_to_clash, ConvertResult, OutputMode};
pub use models::ProxyNode;
pub use parser::{parse_uri, ParseError};
