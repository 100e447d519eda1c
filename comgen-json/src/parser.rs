//! Configuration document -> IR transformation.
//!
//! Parses JSON or YAML text into the document model, then resolves each
//! module declaration by its `class` into the typed IR. Classes the registry
//! does not know are kept as unrecognized declarations; socket synthesis
//! rejects them by name.

use crate::json_model::*;
use comgen_ir::registry::{CLASS_DOIP, CLASS_SOAD, CLASS_SOMEIP};
use comgen_ir::*;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::net::Ipv4Addr;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML deserialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Parse a JSON configuration document into a NetworkConfig.
pub fn parse_json(text: &str) -> Result<NetworkConfig, ParseError> {
    let doc: JsonDocument = serde_json::from_str(text)?;
    document_to_ir(&doc)
}

/// Parse a YAML configuration document into a NetworkConfig.
pub fn parse_yaml(text: &str) -> Result<NetworkConfig, ParseError> {
    let doc: JsonDocument = serde_yaml::from_str(text)?;
    document_to_ir(&doc)
}

/// Transform a parsed document into the IR.
pub fn document_to_ir(doc: &JsonDocument) -> Result<NetworkConfig, ParseError> {
    let modules = doc
        .modules
        .iter()
        .enumerate()
        .map(|(i, m)| module_to_ir(&format!("Modules[{i}]"), m))
        .collect::<Result<Vec<_>, _>>()?;

    let routes = doc
        .routes
        .iter()
        .map(|r| Route::new(&r.from, &r.to, &r.name))
        .collect();

    Ok(NetworkConfig { modules, routes })
}

fn module_to_ir(path: &str, module: &JsonModule) -> Result<ModuleDecl, ParseError> {
    let decl = match module.class.as_str() {
        CLASS_DOIP => ModuleDecl::DoIp(doip_to_ir(path, body(path, &module.fields)?)?),
        CLASS_SOMEIP => ModuleDecl::SomeIp(someip_to_ir(path, body(path, &module.fields)?)?),
        CLASS_SOAD => ModuleDecl::SoAd(soad_to_ir(path, body(path, &module.fields)?)?),
        other => {
            log::debug!("{path}: class '{other}' is not registered");
            ModuleDecl::Unrecognized {
                class: other.to_string(),
                extra: module.fields.clone().into_iter().collect(),
            }
        }
    };
    Ok(decl)
}

fn body<T: DeserializeOwned>(path: &str, fields: &Map<String, Value>) -> Result<T, ParseError> {
    serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| ParseError::InvalidValue(format!("{path}: {e}")))
}

fn required<T>(value: Option<T>, path: &str, field: &str) -> Result<T, ParseError> {
    value.ok_or_else(|| ParseError::MissingField(format!("{path}.{field}")))
}

fn endpoint(text: &str, path: &str) -> Result<Endpoint, ParseError> {
    text.parse()
        .map_err(|e| ParseError::InvalidValue(format!("{path}: {e}")))
}

fn doip_to_ir(path: &str, doip: JsonDoIp) -> Result<DoIpModule, ParseError> {
    let discovery = required(doip.discovery, path, "discovery")?;
    Ok(DoIpModule {
        discovery: endpoint(&discovery, &format!("{path}.discovery"))?,
        max_connections: required(doip.max_connections, path, "max_connections")?,
        extra: doip.extra,
    })
}

fn someip_to_ir(path: &str, someip: JsonSomeIp) -> Result<SomeIpModule, ParseError> {
    let sd = required(someip.sd, path, "SD")?;
    let sd_path = format!("{path}.SD");
    let multicast = required(sd.multicast, &sd_path, "multicast")?;
    let multicast: Ipv4Addr = multicast.parse().map_err(|_| {
        ParseError::InvalidValue(format!("{sd_path}.multicast: invalid address '{multicast}'"))
    })?;

    let servers = services_to_ir(&format!("{path}.servers"), someip.servers)?;
    let clients = services_to_ir(&format!("{path}.clients"), someip.clients)?;

    Ok(SomeIpModule {
        sd: SdConfig {
            multicast,
            extra: sd.extra,
        },
        servers,
        clients,
        extra: someip.extra,
    })
}

fn services_to_ir(path: &str, services: Vec<JsonService>) -> Result<Vec<SomeIpService>, ParseError> {
    services
        .into_iter()
        .enumerate()
        .map(|(i, svc)| service_to_ir(&format!("{path}[{i}]"), svc))
        .collect()
}

fn service_to_ir(path: &str, svc: JsonService) -> Result<SomeIpService, ParseError> {
    let name = required(svc.name, path, "name")?;
    let mut extra = svc.extra;
    // `reliable` takes precedence when a service declares both ports. The
    // field the quality does not use stays in `extra` and is written back.
    let quality = match (svc.reliable, svc.unreliable) {
        (Some(port), unused) => {
            if let Some(unreliable) = unused {
                extra.insert("unreliable".to_string(), Value::from(unreliable));
            }
            TransportQuality::Reliable {
                port,
                listen: svc.listen,
            }
        }
        (None, Some(port)) => {
            if let Some(listen) = svc.listen {
                extra.insert("listen".to_string(), Value::from(listen));
            }
            TransportQuality::Unreliable { port }
        }
        (None, None) => {
            return Err(ParseError::MissingField(format!(
                "{path}.reliable or {path}.unreliable (service '{name}')"
            )));
        }
    };
    Ok(SomeIpService {
        name,
        quality,
        extra,
    })
}

fn soad_to_ir(path: &str, soad: JsonSoAd) -> Result<SoAdModule, ParseError> {
    let sockets = soad
        .sockets
        .into_iter()
        .enumerate()
        .map(|(i, s)| socket_to_ir(&format!("{path}.sockets[{i}]"), s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SoAdModule {
        sockets,
        extra: soad.extra,
    })
}

fn socket_to_ir(path: &str, sock: JsonSocket) -> Result<SocketDescriptor, ParseError> {
    let (role, addr) = match (sock.server, sock.client) {
        (Some(addr), None) => (SocketRole::Server, addr),
        (None, Some(addr)) => (SocketRole::Client, addr),
        (Some(_), Some(_)) => {
            return Err(ParseError::InvalidValue(format!(
                "{path}: socket has both 'server' and 'client'"
            )));
        }
        (None, None) => return Err(ParseError::MissingField(format!("{path}.server or {path}.client"))),
    };
    let protocol = required(sock.protocol, path, "protocol")?;
    let protocol: SocketProtocol = protocol
        .parse()
        .map_err(|e| ParseError::InvalidValue(format!("{path}.protocol: {e}")))?;
    let up = required(sock.up, path, "up")?;

    Ok(SocketDescriptor {
        name: required(sock.name, path, "name")?,
        role,
        endpoint: endpoint(&addr, path)?,
        protocol,
        upper_layer: UpperLayer::from(up.as_str()),
        rx_pdu_id: required(sock.rx_pdu_id, path, "RxPduId")?,
        listen: sock.listen,
        extra: sock.extra,
    })
}
