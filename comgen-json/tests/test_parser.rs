use comgen_ir::*;
use comgen_json::{parse_json, parse_yaml, ParseError};
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;

fn json_fixture() -> &'static str {
    include_str!("../../test-fixtures/network.json")
}

fn yaml_fixture() -> &'static str {
    include_str!("../../test-fixtures/network.yml")
}

#[test]
fn test_parse_fixture_modules() {
    let config = parse_json(json_fixture()).unwrap();
    assert_eq!(config.modules.len(), 2);

    let ModuleDecl::DoIp(doip) = &config.modules[0] else {
        panic!("expected DoIp first, got {:?}", config.modules[0]);
    };
    assert_eq!(
        doip.discovery,
        Endpoint::new(Ipv4Addr::new(172, 18, 0, 200), 13400)
    );
    assert_eq!(doip.max_connections, 4);
    assert_eq!(doip.extra["logical_address"], "0xbeef");

    let someip = config.someip().unwrap();
    assert_eq!(someip.sd.multicast, Ipv4Addr::new(224, 244, 224, 245));
    assert_eq!(someip.sd.extra["initial_delay_max"], 100);
    assert_eq!(someip.servers.len(), 2);
    assert_eq!(
        someip.servers[0].quality,
        TransportQuality::Reliable {
            port: 30560,
            listen: Some(5)
        }
    );
    assert_eq!(
        someip.servers[1].quality,
        TransportQuality::Unreliable { port: 30561 }
    );
    assert_eq!(someip.servers[1].extra["service"], "0x1235");
    assert_eq!(someip.clients[0].name, "hello");
}

#[test]
fn test_parse_fixture_routes() {
    let config = parse_json(json_fixture()).unwrap();
    assert_eq!(config.routes.len(), 7);
    assert_eq!(config.routes[0], Route::new("CanTp", "Dcm", "P2P"));
}

#[test]
fn test_yaml_and_json_agree() {
    let from_json = parse_json(json_fixture()).unwrap();
    let from_yaml = parse_yaml(yaml_fixture()).unwrap();
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_routines_alias() {
    let config = parse_json(r#"{"routines": [{"from": "CanTp", "to": "Dcm", "name": "P2P"}]}"#)
        .unwrap();
    assert!(config.modules.is_empty());
    assert_eq!(config.routes.len(), 1);
}

#[test]
fn test_empty_document() {
    let config = parse_json("{}").unwrap();
    assert_eq!(config, NetworkConfig::default());
}

#[test]
fn test_unknown_class_kept_for_synthesis() {
    let config = parse_json(include_str!("../../test-fixtures/unknown-class.json")).unwrap();
    match &config.modules[1] {
        ModuleDecl::Unrecognized { class, extra } => {
            assert_eq!(class, "Xcp");
            assert_eq!(extra["port"], 5555);
        }
        other => panic!("expected unrecognized module, got {other:?}"),
    }
    let err = synthesize_sockets(&config).unwrap_err();
    assert_eq!(err.to_string(), "unknown class Xcp");
}

#[test]
fn test_missing_discovery() {
    let err = parse_json(r#"{"Modules": [{"class": "DoIp", "max_connections": 1}]}"#).unwrap_err();
    assert!(matches!(err, ParseError::MissingField(ref f) if f == "Modules[0].discovery"));
}

#[test]
fn test_missing_sd() {
    let err = parse_json(r#"{"Modules": [{"class": "SomeIp", "servers": []}]}"#).unwrap_err();
    assert!(matches!(err, ParseError::MissingField(ref f) if f == "Modules[0].SD"));
}

#[test]
fn test_service_without_port() {
    let text = r#"{"Modules": [{"class": "SomeIp", "SD": {"multicast": "224.0.0.1"},
        "clients": [{"name": "Bar"}]}]}"#;
    let err = parse_json(text).unwrap_err();
    assert!(matches!(err, ParseError::MissingField(_)));
    assert!(err.to_string().contains("Modules[0].clients[0]"));
}

#[test]
fn test_invalid_discovery_address() {
    let err = parse_json(
        r#"{"Modules": [{"class": "DoIp", "discovery": "ecu:13400", "max_connections": 1}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue(_)));
    assert!(err.to_string().contains("Modules[0].discovery"));
}

#[test]
fn test_wrong_field_type() {
    let err = parse_json(
        r#"{"Modules": [{"class": "DoIp", "discovery": "NULL:13400", "max_connections": "many"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue(_)));
}

#[test]
fn test_declared_soad_sockets() {
    let text = r#"{"Modules": [{"class": "SoAd", "sockets": [
        {"name": "XCP", "client": "192.168.1.2:5555", "protocol": "UDP", "up": "XCP", "RxPduId": "XCP_RX"}
    ]}]}"#;
    let config = parse_json(text).unwrap();
    let sock = &config.sockets()[0];
    assert_eq!(sock.role, SocketRole::Client);
    assert_eq!(sock.endpoint.to_string(), "192.168.1.2:5555");
    assert_eq!(sock.upper_layer, UpperLayer::Other("XCP".into()));
}

#[test]
fn test_bad_socket_protocol() {
    let text = r#"{"Modules": [{"class": "SoAd", "sockets": [
        {"name": "X", "server": "NULL:1", "protocol": "SCTP", "up": "SD", "RxPduId": "X"}
    ]}]}"#;
    let err = parse_json(text).unwrap_err();
    assert!(err.to_string().contains("SCTP"));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(parse_json("{"), Err(ParseError::Json(_))));
    assert!(matches!(parse_yaml("Modules: [\n"), Err(ParseError::Yaml(_))));
}
