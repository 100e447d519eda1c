use crate::error::CompileError;
use crate::routing::compile_routing;
use crate::selftest::mirror_someip;
use crate::sockets::complete_network;
use crate::types::{NetworkConfig, RoutingModel};

/// Output of one compilation pass, handed to the emitters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledConfig {
    /// Input modules with the socket-adaptation module fully populated.
    pub network: NetworkConfig,
    pub routing: RoutingModel,
}

/// Run socket synthesis and routing derivation over one configuration.
pub fn compile(config: &NetworkConfig) -> Result<CompiledConfig, CompileError> {
    let network = complete_network(config)?;
    let routing = compile_routing(&config.routes)?;
    log::debug!(
        "compiled {} modules, {} sockets, {} routing paths",
        network.modules.len(),
        network.sockets().len(),
        routing.paths.len()
    );
    Ok(CompiledConfig { network, routing })
}

/// Compile the SOME/IP loopback mirror of `config`, if it has a SOME/IP module.
pub fn compile_self_test(config: &NetworkConfig) -> Result<Option<CompiledConfig>, CompileError> {
    match mirror_someip(config) {
        Some(mirrored) => compile(&mirrored).map(Some),
        None => Ok(None),
    }
}
