//! YAML tree compaction

use serde_yaml::{Mapping, Value};

/// Recursively removes null values, empty strings, empty sequences and empty
/// mappings, bottom-up. A container that becomes empty after its children
/// are pruned is itself removed. Returns `None` when the whole value
/// compacts away.
pub fn compact_value(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Sequence(seq) => {
            let seq: Vec<Value> = seq.into_iter().filter_map(compact_value).collect();
            if seq.is_empty() {
                None
            } else {
                Some(Value::Sequence(seq))
            }
        }
        Value::Mapping(map) => {
            let map: Mapping = map
                .into_iter()
                .filter_map(|(key, value)| compact_value(value).map(|value| (key, value)))
                .collect();
            if map.is_empty() {
                None
            } else {
                Some(Value::Mapping(map))
            }
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_drops_empty_leaves() {
        let value: Value = serde_yaml::from_str(
            r#"
name: node
empty: ""
missing: null
port: 443
"#,
        )
        .unwrap();
        let compacted = compact_value(value).unwrap();
        let map = compacted.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("name"));
        assert!(map.contains_key("port"));
    }

    #[test]
    fn test_compact_removes_container_emptied_by_pruning() {
        let value: Value = serde_yaml::from_str(
            r#"
name: node
ws-opts:
  headers:
    Host: ""
  path: null
"#,
        )
        .unwrap();
        let compacted = compact_value(value).unwrap();
        let map = compacted.as_mapping().unwrap();
        assert!(!map.contains_key("ws-opts"));
    }

    #[test]
    fn test_compact_keeps_false_and_zero() {
        let value: Value = serde_yaml::from_str("enabled: false\ncount: 0\n").unwrap();
        let compacted = compact_value(value).unwrap();
        let map = compacted.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_compact_whole_tree_away() {
        let value: Value = serde_yaml::from_str("a: null\nb: []\nc: {}\n").unwrap();
        assert!(compact_value(value).is_none());
    }
}
