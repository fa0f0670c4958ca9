//! Pulls proxy entries out of a parsed configuration document.
//!
//! Real-world documents spell the proxy list many ways: the modern
//! `proxies` key, the legacy `Proxy` key, a provider-style `payload` list,
//! lists nested inside `proxy-providers`, or a document that is nothing but
//! the list itself. All of them are accepted here.

use std::collections::HashSet;

use serde_yaml::Value;

/// Collects every plausible proxy mapping from the document, in document
/// order, deduplicated by `(name, server, port)` with the first occurrence
/// winning. Entries without a usable name, server and port are dropped.
pub fn extract_proxies(document: &Value) -> Vec<Value> {
    let mut candidates: Vec<Value> = Vec::new();

    match document {
        Value::Mapping(map) => {
            for key in ["proxies", "Proxy", "payload"] {
                if let Some(Value::Sequence(list)) = map.get(key) {
                    candidates.extend(list.iter().cloned());
                }
            }
            if let Some(Value::Mapping(providers)) = map.get("proxy-providers") {
                for (_, provider) in providers {
                    if let Value::Mapping(provider) = provider {
                        let list = match provider.get("proxies") {
                            Some(Value::Sequence(list)) if !list.is_empty() => Some(list),
                            _ => match provider.get("payload") {
                                Some(Value::Sequence(list)) => Some(list),
                                _ => None,
                            },
                        };
                        if let Some(list) = list {
                            candidates.extend(list.iter().cloned());
                        }
                    }
                }
            }
        }
        Value::Sequence(list) => candidates.extend(list.iter().cloned()),
        _ => {}
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut proxies = Vec::new();
    for mut candidate in candidates {
        if !candidate.is_mapping() {
            continue;
        }
        coerce_port(&mut candidate);
        let Some(key) = identity_key(&candidate) else {
            continue;
        };
        if seen.insert(key) {
            proxies.push(candidate);
        }
    }
    proxies
}

/// Writers disagree on whether `port` is a number or a quoted string;
/// normalize to a number so the typed model accepts both.
fn coerce_port(entry: &mut Value) {
    let Value::Mapping(map) = entry else { return };
    if let Some(port) = map.get_mut("port") {
        if let Value::String(text) = port {
            if let Ok(number) = text.trim().parse::<u64>() {
                *port = Value::Number(number.into());
            }
        }
    }
}

fn identity_key(entry: &Value) -> Option<String> {
    let map = entry.as_mapping()?;
    let name = scalar_text(map.get("name")?)?;
    let server = scalar_text(map.get("server")?)?;
    let port = scalar_text(map.get("port")?)?;
    Some(format!("{}|{}|{}", name, server, port))
}

/// A usable scalar: a non-empty string or a non-zero number.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_proxies_key() {
        let proxies = extract_proxies(&doc(
            "proxies:\n  - {name: A, server: a.example, port: 1}\n  - {name: B, server: b.example, port: 2}\n",
        ));
        assert_eq!(proxies.len(), 2);
    }

    #[test]
    fn test_legacy_proxy_key_and_payload() {
        let proxies = extract_proxies(&doc(
            "Proxy:\n  - {name: A, server: a.example, port: 1}\npayload:\n  - {name: B, server: b.example, port: 2}\n",
        ));
        assert_eq!(proxies.len(), 2);
    }

    #[test]
    fn test_proxy_providers() {
        let proxies = extract_proxies(&doc(
            "proxy-providers:\n  mine:\n    type: inline\n    payload:\n      - {name: A, server: a.example, port: 1}\n",
        ));
        assert_eq!(proxies.len(), 1);
    }

    #[test]
    fn test_bare_list_document() {
        let proxies = extract_proxies(&doc(
            "- {name: A, server: a.example, port: 1}\n- {name: B, server: b.example, port: 2}\n",
        ));
        assert_eq!(proxies.len(), 2);
    }

    #[test]
    fn test_dedup_first_wins() {
        let proxies = extract_proxies(&doc(
            "proxies:\n  - {name: A, server: a.example, port: 1, cipher: first}\npayload:\n  - {name: A, server: a.example, port: 1, cipher: second}\n",
        ));
        assert_eq!(proxies.len(), 1);
        assert_eq!(
            proxies[0].as_mapping().unwrap().get("cipher").unwrap(),
            &Value::String("first".to_string())
        );
    }

    #[test]
    fn test_string_port_coerced() {
        let proxies = extract_proxies(&doc(
            "proxies:\n  - {name: A, server: a.example, port: \"8080\"}\n",
        ));
        assert_eq!(
            proxies[0].as_mapping().unwrap().get("port").unwrap(),
            &Value::Number(8080.into())
        );
    }

    #[test]
    fn test_incomplete_entries_dropped() {
        let proxies = extract_proxies(&doc(
            "proxies:\n  - {name: A, port: 1}\n  - {name: \"\", server: a.example, port: 1}\n  - {name: B, server: b.example, port: 0}\n  - not-a-mapping\n",
        ));
        assert!(proxies.is_empty());
    }
}
