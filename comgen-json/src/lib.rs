pub mod json_model;
pub mod parser;
pub mod validator;
pub mod writer;

pub use parser::{parse_json, parse_yaml, ParseError};
pub use validator::{validate_json_schema, validate_yaml_schema, SchemaError};
pub use writer::{write_network, write_routing, WriteError};
