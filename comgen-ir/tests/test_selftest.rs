use comgen_ir::selftest::swap_roles;
use comgen_ir::*;
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;

fn service(name: &str, quality: TransportQuality) -> SomeIpService {
    SomeIpService {
        name: name.into(),
        quality,
        extra: Extra::new(),
    }
}

fn someip() -> SomeIpModule {
    SomeIpModule {
        sd: SdConfig {
            multicast: Ipv4Addr::new(224, 224, 224, 245),
            extra: Extra::new(),
        },
        servers: vec![service(
            "Foo",
            TransportQuality::Reliable {
                port: 30501,
                listen: None,
            },
        )],
        clients: vec![service("Bar", TransportQuality::Unreliable { port: 30502 })],
        extra: Extra::new(),
    }
}

fn config() -> NetworkConfig {
    NetworkConfig {
        modules: vec![
            ModuleDecl::DoIp(DoIpModule {
                discovery: "10.0.0.1:13400".parse().unwrap(),
                max_connections: 5,
                extra: Extra::new(),
            }),
            ModuleDecl::SomeIp(someip()),
        ],
        routes: vec![Route::new("DoIP", "Dcm", "DIAG")],
    }
}

#[test]
fn test_swap_roles() {
    let original = someip();
    let mirrored = swap_roles(&original);
    assert_eq!(mirrored.servers, original.clients);
    assert_eq!(mirrored.clients, original.servers);
    assert_eq!(mirrored.sd, original.sd);
    assert_eq!(swap_roles(&mirrored), original);
}

#[test]
fn test_mirror_keeps_only_someip() {
    let mirrored = mirror_someip(&config()).unwrap();
    assert_eq!(mirrored.modules.len(), 1);
    assert_eq!(mirrored.modules[0], ModuleDecl::SomeIp(swap_roles(&someip())));
    assert_eq!(mirrored.routes, config().routes);
}

#[test]
fn test_mirror_without_someip() {
    let cfg = NetworkConfig {
        modules: vec![ModuleDecl::SoAd(SoAdModule::default())],
        routes: vec![],
    };
    assert!(mirror_someip(&cfg).is_none());
    assert!(compile_self_test(&cfg).unwrap().is_none());
}

#[test]
fn test_mirrored_sockets_swap_roles() {
    let compiled = compile_self_test(&config()).unwrap().unwrap();
    let sockets = compiled.network.sockets();
    let summary: Vec<(&str, SocketRole, SocketProtocol, Option<u32>)> = sockets
        .iter()
        .map(|s| (s.name.as_str(), s.role, s.protocol, s.listen))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("SD_MULTICAST", SocketRole::Server, SocketProtocol::Udp, None),
            ("SD_UNICAST", SocketRole::Server, SocketProtocol::Udp, None),
            ("SOMEIP_BAR", SocketRole::Server, SocketProtocol::Udp, None),
            ("SOMEIP_FOO", SocketRole::Client, SocketProtocol::Tcp, None),
        ]
    );
    // SomeIp module plus the synthesized SoAd module
    assert_eq!(compiled.network.modules.len(), 2);
    assert_eq!(compiled.routing.paths.len(), 1);
}

#[test]
fn test_mirrored_reliable_client_becomes_listening_server() {
    let mut module = someip();
    module.clients.push(service(
        "Seat",
        TransportQuality::Reliable {
            port: 30700,
            listen: Some(6),
        },
    ));
    let cfg = NetworkConfig {
        modules: vec![ModuleDecl::SomeIp(module)],
        routes: vec![],
    };
    let compiled = compile_self_test(&cfg).unwrap().unwrap();
    let seat = compiled
        .network
        .sockets()
        .iter()
        .find(|s| s.name == "SOMEIP_SEAT")
        .unwrap();
    assert_eq!(seat.role, SocketRole::Server);
    assert_eq!(seat.listen, Some(6));
}
