//! Socket synthesis: every transport module contributes the sockets it needs
//! and the socket-adaptation module ends up owning all of them.

use crate::error::CompileError;
use crate::registry;
use crate::types::{
    DoIpModule, Endpoint, Extra, ModuleDecl, NetworkConfig, SoAdModule, SocketDescriptor,
    SocketProtocol, SocketRole, SomeIpModule, SomeIpService, UpperLayer,
};

/// Well-known DoIP TCP data port.
pub const DOIP_TCP_PORT: u16 = 13400;
/// Well-known SOME/IP service discovery port.
pub const SD_PORT: u16 = 30490;

fn socket(
    name: String,
    role: SocketRole,
    endpoint: Endpoint,
    protocol: SocketProtocol,
    upper_layer: UpperLayer,
    rx_pdu_id: String,
    listen: Option<u32>,
) -> SocketDescriptor {
    SocketDescriptor {
        name,
        role,
        endpoint,
        protocol,
        upper_layer,
        rx_pdu_id,
        listen,
        extra: Extra::new(),
    }
}

/// Vehicle discovery over UDP, diagnostics over TCP.
pub fn doip_sockets(module: &DoIpModule) -> Vec<SocketDescriptor> {
    vec![
        socket(
            "DOIP_UDP".into(),
            SocketRole::Server,
            module.discovery,
            SocketProtocol::Udp,
            UpperLayer::DoIp,
            "DOIP_RX_PID_UDP".into(),
            None,
        ),
        socket(
            "DOIP_TCP".into(),
            SocketRole::Server,
            Endpoint::unspecified(DOIP_TCP_PORT),
            SocketProtocol::Tcp,
            UpperLayer::DoIp,
            "DOIP_RX_PID_TCP".into(),
            Some(module.max_connections),
        ),
    ]
}

/// Two service discovery sockets, then one socket per server, then one per client.
pub fn someip_sockets(module: &SomeIpModule) -> Vec<SocketDescriptor> {
    let mut sockets = vec![
        socket(
            "SD_MULTICAST".into(),
            SocketRole::Server,
            Endpoint::new(module.sd.multicast, SD_PORT),
            SocketProtocol::Udp,
            UpperLayer::Sd,
            "SD_RX_PID_MULTICAST".into(),
            None,
        ),
        socket(
            "SD_UNICAST".into(),
            SocketRole::Server,
            Endpoint::unspecified(SD_PORT),
            SocketProtocol::Udp,
            UpperLayer::Sd,
            "SD_RX_PID_UNICAST".into(),
            None,
        ),
    ];
    sockets.extend(
        module
            .servers
            .iter()
            .map(|svc| service_socket(svc, SocketRole::Server)),
    );
    sockets.extend(
        module
            .clients
            .iter()
            .map(|svc| service_socket(svc, SocketRole::Client)),
    );
    sockets
}

fn service_socket(service: &SomeIpService, role: SocketRole) -> SocketDescriptor {
    let name = format!("SOMEIP_{}", service.name.to_uppercase());
    let rx_pdu_id = format!("SOMEIP_RX_PID_{name}");
    let listen = match role {
        SocketRole::Server => service.quality.listen_backlog(),
        SocketRole::Client => None,
    };
    socket(
        name,
        role,
        Endpoint::unspecified(service.quality.port()),
        service.quality.protocol(),
        UpperLayer::SomeIp,
        rx_pdu_id,
        listen,
    )
}

/// Derive the sockets of every declared module, in declaration order.
///
/// Fails on the first module whose class is not registered.
pub fn synthesize_sockets(config: &NetworkConfig) -> Result<Vec<SocketDescriptor>, CompileError> {
    let mut sockets = Vec::new();
    for module in &config.modules {
        let class = registry::lookup_class(module.class_name()).ok_or_else(|| {
            CompileError::UnknownClass {
                class: module.class_name().to_string(),
            }
        })?;
        let derived = (class.derive)(module);
        log::debug!("{}: {} sockets", class.name, derived.len());
        sockets.extend(derived);
    }
    Ok(sockets)
}

/// Copy of `config` whose socket-adaptation module (appended when absent)
/// holds its declared sockets followed by every synthesized one.
///
/// On error `config` is left as it was and no partial result exists.
pub fn complete_network(config: &NetworkConfig) -> Result<NetworkConfig, CompileError> {
    let derived = synthesize_sockets(config)?;

    let mut network = config.clone();
    if network.soad().is_none() {
        log::debug!("no socket-adaptation module declared, adding one");
        network
            .modules
            .push(ModuleDecl::SoAd(SoAdModule::default()));
    }
    if let Some(soad) = network.soad_mut() {
        soad.sockets.extend(derived);
    }
    Ok(network)
}
