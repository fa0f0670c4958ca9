//! Proxy model definitions
//!
//! Contains the core data structures for proxy configurations.

pub mod node;

pub use node::ProxyNode;
