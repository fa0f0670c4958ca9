pub mod base64;
pub mod net;
pub mod string;
pub mod url;
pub mod yaml;

// Re-export common utilities
pub use base64::decode_base64_or_original;
pub use string::is_truthy;
pub use url::{url_decode, url_encode};
pub use yaml::compact_value;
