use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Entry types that can appear in a document and survive serialization but
/// have no link format of their own (`direct`, `dns`, `ssh`, `snell`).
/// Anything beyond the base shape is carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassthroughNode {
    pub name: String,
    pub server: String,
    pub port: u16,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}
