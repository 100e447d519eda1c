use comgen_json::{validate_json_schema, validate_yaml_schema};

#[test]
fn test_fixtures_are_schema_valid() {
    let json = include_str!("../../test-fixtures/network.json");
    assert!(validate_json_schema(json).is_ok(), "{:?}", validate_json_schema(json));
    let yaml = include_str!("../../test-fixtures/network.yml");
    assert!(validate_yaml_schema(yaml).is_ok(), "{:?}", validate_yaml_schema(yaml));
}

#[test]
fn test_unknown_class_passes_schema() {
    // Unknown classes are rejected later, by name.
    let json = include_str!("../../test-fixtures/unknown-class.json");
    assert!(validate_json_schema(json).is_ok());
}

#[test]
fn test_module_without_class() {
    let errors = validate_json_schema(r#"{"Modules": [{"discovery": "NULL:13400"}]}"#).unwrap_err();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e.path == "/Modules/0"), "{errors:?}");
}

#[test]
fn test_doip_requires_discovery() {
    let errors =
        validate_json_schema(r#"{"Modules": [{"class": "DoIp", "max_connections": 2}]}"#).unwrap_err();
    assert!(errors.iter().any(|e| e.message.contains("discovery")), "{errors:?}");
}

#[test]
fn test_service_requires_a_port() {
    let text = r#"{"Modules": [{"class": "SomeIp", "SD": {"multicast": "224.0.0.1"},
        "servers": [{"name": "Foo"}]}]}"#;
    let errors = validate_json_schema(text).unwrap_err();
    assert!(
        errors.iter().any(|e| e.path.starts_with("/Modules/0/servers/0")),
        "{errors:?}"
    );
}

#[test]
fn test_route_requires_name() {
    let errors = validate_json_schema(r#"{"routes": [{"from": "CanTp", "to": "Dcm"}]}"#).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().starts_with("/routes/0: "));
}

#[test]
fn test_parse_error_reported_as_schema_error() {
    let errors = validate_json_schema("{").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].path.is_empty());
    assert!(errors[0].message.starts_with("JSON parse error"));
}
