pub mod compile;
pub mod error;
pub mod registry;
pub mod routing;
pub mod selftest;
pub mod sockets;
pub mod types;
pub mod validate;

pub use compile::{compile, compile_self_test, CompiledConfig};
pub use error::CompileError;
pub use routing::compile_routing;
pub use selftest::mirror_someip;
pub use sockets::{complete_network, synthesize_sockets};
pub use types::*;
pub use validate::{validate_network, validate_routing, ValidationError};
