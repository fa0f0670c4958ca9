//! Link and document parsing.

pub mod clash;
pub mod explodes;

use thiserror::Error;

/// Why a single share link could not be turned into a proxy entry.
///
/// The batch drivers drop the offending line and keep going; none of these
/// ever crosses the conversion boundary.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported uri scheme: {0}")]
    UnsupportedScheme(String),
    #[error("malformed {scheme} link: {reason}")]
    Malformed {
        scheme: &'static str,
        reason: &'static str,
    },
    #[error("unsupported plugin option: {0}")]
    UnsupportedPlugin(String),
    #[error("unsupported obfs: {0}")]
    UnsupportedObfs(String),
}

impl ParseError {
    pub(crate) fn malformed(scheme: &'static str, reason: &'static str) -> Self {
        ParseError::Malformed { scheme, reason }
    }
}

pub use clash::extract_proxies;
pub use explodes::parse_uri;
