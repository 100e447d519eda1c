//! Lookup tables for the module classes and route modules the compiler knows.
//!
//! Module classes appear as `class` in `Modules` declarations and map to the
//! function deriving their sockets. Route modules appear as `from`/`to` in
//! routes and map to their fixed layer and transmit API.

use crate::sockets;
use crate::types::{ModuleDecl, ModuleLayer, SocketDescriptor};

pub const CLASS_DOIP: &str = "DoIp";
pub const CLASS_SOMEIP: &str = "SomeIp";
pub const CLASS_SOAD: &str = "SoAd";

/// Socket derivation for one module class.
pub type DeriveEndpoints = fn(&ModuleDecl) -> Vec<SocketDescriptor>;

pub struct ModuleClass {
    pub name: &'static str,
    pub derive: DeriveEndpoints,
}

pub const MODULE_CLASSES: &[ModuleClass] = &[
    ModuleClass {
        name: CLASS_DOIP,
        derive: derive_doip,
    },
    ModuleClass {
        name: CLASS_SOMEIP,
        derive: derive_someip,
    },
    ModuleClass {
        name: CLASS_SOAD,
        derive: derive_none,
    },
];

pub fn lookup_class(name: &str) -> Option<&'static ModuleClass> {
    MODULE_CLASSES.iter().find(|c| c.name == name)
}

// Each derivation is only ever handed declarations of its own class:
// `synthesize_sockets` looks the entry up by `ModuleDecl::class_name`.

fn derive_doip(module: &ModuleDecl) -> Vec<SocketDescriptor> {
    match module {
        ModuleDecl::DoIp(m) => sockets::doip_sockets(m),
        other => unreachable!("{} module registered as {CLASS_DOIP}", other.class_name()),
    }
}

fn derive_someip(module: &ModuleDecl) -> Vec<SocketDescriptor> {
    match module {
        ModuleDecl::SomeIp(m) => sockets::someip_sockets(m),
        other => unreachable!("{} module registered as {CLASS_SOMEIP}", other.class_name()),
    }
}

// The socket-adaptation module receives sockets, it never contributes any.
fn derive_none(module: &ModuleDecl) -> Vec<SocketDescriptor> {
    match module {
        ModuleDecl::SoAd(_) => Vec::new(),
        other => unreachable!("{} module registered as {CLASS_SOAD}", other.class_name()),
    }
}

// --- Route modules ---

pub const MODULE_DCM: &str = "Dcm";
pub const MODULE_DOIP: &str = "DoIP";
pub const MODULE_CANTP: &str = "CanTp";
pub const MODULE_LINTP: &str = "LinTp";
pub const MODULE_CANIF: &str = "CanIf";

pub struct RouteModule {
    pub name: &'static str,
    pub layer: ModuleLayer,
    /// Transmit API the router calls to hand a PDU to this module.
    pub transmit: Option<&'static str>,
}

pub const ROUTE_MODULES: &[RouteModule] = &[
    RouteModule {
        name: MODULE_DCM,
        layer: ModuleLayer::Application,
        transmit: None,
    },
    RouteModule {
        name: MODULE_DOIP,
        layer: ModuleLayer::Transport,
        transmit: Some("DoIP_TpTransmit"),
    },
    RouteModule {
        name: MODULE_CANTP,
        layer: ModuleLayer::Transport,
        transmit: Some("CanTp_Transmit"),
    },
    RouteModule {
        name: MODULE_LINTP,
        layer: ModuleLayer::Transport,
        transmit: Some("LinTp_Transmit"),
    },
    RouteModule {
        name: MODULE_CANIF,
        layer: ModuleLayer::Link,
        transmit: Some("CanIf_Transmit"),
    },
];

pub fn lookup_route_module(name: &str) -> Option<&'static RouteModule> {
    ROUTE_MODULES.iter().find(|m| m.name == name)
}

pub fn module_layer(name: &str) -> Option<ModuleLayer> {
    lookup_route_module(name).map(|m| m.layer)
}

pub fn is_application_module(name: &str) -> bool {
    module_layer(name) == Some(ModuleLayer::Application)
}

pub fn is_transport_module(name: &str) -> bool {
    module_layer(name) == Some(ModuleLayer::Transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_classes_resolve() {
        for class in [CLASS_DOIP, CLASS_SOMEIP, CLASS_SOAD] {
            assert!(lookup_class(class).is_some(), "{class} should be registered");
        }
    }

    #[test]
    fn class_lookup_is_case_sensitive() {
        assert!(lookup_class("DoIP").is_none());
        assert!(lookup_class("someip").is_none());
    }

    #[test]
    fn every_class_derives_its_own_declarations() {
        use crate::types::{DoIpModule, Extra, SdConfig, SoAdModule, SomeIpModule};

        let decls = [
            ModuleDecl::DoIp(DoIpModule {
                discovery: "10.0.0.1:13400".parse().unwrap(),
                max_connections: 1,
                extra: Extra::new(),
            }),
            ModuleDecl::SomeIp(SomeIpModule {
                sd: SdConfig {
                    multicast: std::net::Ipv4Addr::new(224, 224, 224, 245),
                    extra: Extra::new(),
                },
                servers: vec![],
                clients: vec![],
                extra: Extra::new(),
            }),
            ModuleDecl::SoAd(SoAdModule::default()),
        ];
        for decl in &decls {
            let class = lookup_class(decl.class_name()).unwrap();
            assert_eq!(class.name, decl.class_name());
            // panics if the entry points at another class's derivation
            let _ = (class.derive)(decl);
        }
        assert_eq!(decls.len(), MODULE_CLASSES.len());
    }

    #[test]
    fn soad_derives_nothing() {
        let soad = ModuleDecl::SoAd(crate::types::SoAdModule::default());
        let class = lookup_class(CLASS_SOAD).unwrap();
        assert!((class.derive)(&soad).is_empty());
    }

    #[test]
    fn transport_set() {
        assert!(is_transport_module("DoIP"));
        assert!(is_transport_module("CanTp"));
        assert!(is_transport_module("LinTp"));
        assert!(!is_transport_module("CanIf"));
        assert!(!is_transport_module("Dcm"));
    }

    #[test]
    fn application_set() {
        assert!(is_application_module("Dcm"));
        assert!(!is_application_module("CanTp"));
        assert_eq!(module_layer("CanIf"), Some(ModuleLayer::Link));
        assert_eq!(module_layer("Com"), None);
    }
}
