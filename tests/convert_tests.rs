use linkclash::{clash_to_link, link_to_clash, parse_uri, OutputMode, ProxyNode};

const SS_LINK: &str = "ss://YWVzLTI1Ni1nY206cGFzcw==@example.com:8388#SS%20Node";
const TROJAN_LINK: &str =
    "trojan://s3cret@t.example.com:443?sni=sni.example.com&type=ws&host=cdn.example.com&path=%2Ftr#Trojan%20Node";
const VMESS_LINK: &str = "vmess://eyJ2IjoiMiIsInBzIjoiVGVzdCBWTWVzcyIsImFkZCI6ImV4YW1wbGUuY29tIiwicG9ydCI6IjQ0MyIsImlkIjoiMTExMTExMTEtMjIyMi0zMzMzLTQ0NDQtNTU1NTU1NTU1NTU1IiwiYWlkIjoiMCIsInNjeSI6ImF1dG8iLCJuZXQiOiJ3cyIsInR5cGUiOiJub25lIiwiaG9zdCI6ImNkbi5leGFtcGxlLmNvbSIsInBhdGgiOiIvd3MiLCJ0bHMiOiJ0bHMiLCJzbmkiOiJzbmkuZXhhbXBsZS5jb20ifQ==";

#[test]
fn mixed_batch_produces_one_entry_per_good_link() {
    let result = link_to_clash(
        [SS_LINK, "", "garbage://nope", TROJAN_LINK, VMESS_LINK],
        OutputMode::Proxies,
    );
    assert!(result.success);
    assert!(result.data.starts_with("proxies:\n"));
    assert_eq!(result.data.matches("- type:").count(), 3);
    assert!(result.data.contains("- type: ss"));
    assert!(result.data.contains("- type: trojan"));
    assert!(result.data.contains("- type: vmess"));
}

#[test]
fn empty_input_fails_with_comment() {
    let result = link_to_clash(Vec::<&str>::new(), OutputMode::Proxies);
    assert!(!result.success);
    assert!(result.data.starts_with('#'));
}

#[test]
fn wrapping_modes() {
    let proxies = link_to_clash([SS_LINK], OutputMode::Proxies);
    let payload = link_to_clash([SS_LINK], OutputMode::Payload);
    let none = link_to_clash([SS_LINK], OutputMode::None);
    assert!(proxies.data.starts_with("proxies:\n- "));
    assert!(payload.data.starts_with("payload:\n- "));
    assert!(none.data.starts_with("- "));
    assert_eq!(proxies.data.strip_prefix("proxies:\n"), Some(none.data.as_str()));
    assert_eq!(payload.data.strip_prefix("payload:\n"), Some(none.data.as_str()));
}

#[test]
fn generated_document_is_valid_yaml() {
    let result = link_to_clash([SS_LINK, TROJAN_LINK], OutputMode::Proxies);
    let value: serde_yaml::Value = serde_yaml::from_str(&result.data).unwrap();
    let list = value.get("proxies").unwrap().as_sequence().unwrap();
    assert_eq!(list.len(), 2);
}

#[test]
fn invalid_yaml_fails_with_comment() {
    let result = clash_to_link("proxies: [unclosed");
    assert!(!result.success);
    assert!(result.data.starts_with("# YAML parse error:"));
}

#[test]
fn dedup_is_first_wins_across_candidate_keys() {
    let document = "\
proxies:
  - name: Node
    type: ss
    server: example.com
    port: 8388
    cipher: aes-256-gcm
    password: first
payload:
  - name: Node
    type: ss
    server: example.com
    port: 8388
    cipher: aes-256-gcm
    password: second
  - name: Other
    type: ss
    server: other.example.com
    port: 8388
    cipher: aes-256-gcm
    password: third
";
    let result = clash_to_link(document);
    assert!(result.success);
    let links: Vec<&str> = result.data.lines().collect();
    assert_eq!(links.len(), 2);
    let first = match parse_uri(links[0]).unwrap() {
        ProxyNode::Shadowsocks(node) => node,
        other => panic!("wrong variant: {:?}", other),
    };
    assert_eq!(first.password.as_deref(), Some("first"));
}

#[test]
fn string_ports_are_accepted() {
    let document = "proxies:\n  - {name: A, type: socks5, server: s.example, port: \"1080\"}\n";
    let result = clash_to_link(document);
    assert!(result.success);
    assert!(result.data.starts_with("socks5://s.example:1080"));
}

#[test]
fn full_roundtrip_through_document() {
    let forward = link_to_clash([SS_LINK, TROJAN_LINK, VMESS_LINK], OutputMode::Proxies);
    assert!(forward.success);

    let backward = clash_to_link(&forward.data);
    assert!(backward.success);
    let links: Vec<&str> = backward.data.lines().collect();
    assert_eq!(links.len(), 3);

    for (original, regenerated) in [SS_LINK, TROJAN_LINK, VMESS_LINK].iter().zip(&links) {
        assert_eq!(
            parse_uri(original).unwrap(),
            parse_uri(regenerated).unwrap(),
            "entry drifted through the document: {}",
            original
        );
    }
}

#[test]
fn top_level_payload_trojan_converts() {
    let document = "\
payload:
  - name: T
    type: trojan
    server: t.example
    port: 8443
    password: p@ss w0rd
";
    let result = clash_to_link(document);
    assert!(result.success);
    assert_eq!(result.data, "trojan://p%40ss%20w0rd@t.example:8443#T");
}

#[test]
fn provider_payload_documents_convert() {
    let document = "\
proxy-providers:
  home:
    type: file
    payload:
      - name: H
        type: hysteria2
        server: h.example
        port: 443
        password: pw
        sni: sni.example
";
    let result = clash_to_link(document);
    assert!(result.success);
    assert!(result.data.starts_with("hysteria2://pw@h.example:443?sni=sni.example"));
}
