//! Loopback configuration for testing a SOME/IP setup against itself.
//!
//! The mirror keeps only the SOME/IP module and swaps its servers and
//! clients, so a test node built from it offers what the real node
//! consumes and consumes what it offers.

use crate::types::{ModuleDecl, NetworkConfig, SomeIpModule};

/// Same module with server and client roles exchanged.
pub fn swap_roles(module: &SomeIpModule) -> SomeIpModule {
    let mut mirrored = module.clone();
    std::mem::swap(&mut mirrored.servers, &mut mirrored.clients);
    mirrored
}

/// Mirror of `config` reduced to its SOME/IP module, or `None` when it
/// declares none. Routes are carried over unchanged.
///
/// When several SOME/IP modules are declared the last one is mirrored.
pub fn mirror_someip(config: &NetworkConfig) -> Option<NetworkConfig> {
    let someip: Vec<&SomeIpModule> = config
        .modules
        .iter()
        .filter_map(|m| match m {
            ModuleDecl::SomeIp(s) => Some(s),
            _ => None,
        })
        .collect();
    if someip.len() > 1 {
        log::warn!(
            "{} SOME/IP modules declared, mirroring the last one",
            someip.len()
        );
    }
    let module = someip.last()?;

    Some(NetworkConfig {
        modules: vec![ModuleDecl::SomeIp(swap_roles(module))],
        routes: config.routes.clone(),
    })
}
