//! Schema check of a configuration document, before it is parsed into IR.

use jsonschema::Validator;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

const SCHEMA_JSON: &str = include_str!("../schema/network.schema.json");

// Built once; the schema is part of the binary.
static VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    let schema: Value = serde_json::from_str(SCHEMA_JSON).expect("embedded schema is valid JSON");
    jsonschema::draft202012::new(&schema).expect("embedded schema is a valid JSON Schema")
});

/// One schema violation. `path` is the JSON pointer of the offending
/// value, empty when the document could not be read at all.
#[derive(Debug, Clone)]
pub struct SchemaError {
    pub path: String,
    pub message: String,
}

impl SchemaError {
    fn unreadable(kind: &str, e: &dyn fmt::Display) -> Vec<Self> {
        vec![Self {
            path: String::new(),
            message: format!("{kind} parse error: {e}"),
        }]
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_str() {
            "" => f.write_str(&self.message),
            path => write!(f, "{path}: {}", self.message),
        }
    }
}

pub fn validate_json_schema(json_text: &str) -> Result<(), Vec<SchemaError>> {
    let instance: Value =
        serde_json::from_str(json_text).map_err(|e| SchemaError::unreadable("JSON", &e))?;
    validate_instance(&instance)
}

pub fn validate_yaml_schema(yaml_text: &str) -> Result<(), Vec<SchemaError>> {
    let instance: Value =
        serde_yaml::from_str(yaml_text).map_err(|e| SchemaError::unreadable("YAML", &e))?;
    validate_instance(&instance)
}

/// Check an already loaded document, collecting every violation.
pub fn validate_instance(instance: &Value) -> Result<(), Vec<SchemaError>> {
    let errors: Vec<SchemaError> = VALIDATOR
        .iter_errors(instance)
        .map(|e| SchemaError {
            path: e.instance_path().to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
