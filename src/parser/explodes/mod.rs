pub mod common;
pub mod http;
pub mod hysteria;
pub mod hysteria2;
pub mod socks;
pub mod ss;
pub mod ssr;
pub mod trojan;
pub mod tuic;
pub mod vless;
pub mod vmess;
pub mod wireguard;

pub use common::parse_uri;
