//! IR -> JSON documents.
//!
//! `write_network` produces the completed network configuration in the same
//! shape the parser reads, so a written document parses back to the same IR.
//! `write_routing` serializes the routing model as is.

use crate::json_model::*;
use comgen_ir::registry::{CLASS_DOIP, CLASS_SOAD, CLASS_SOMEIP};
use comgen_ir::*;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a network configuration to pretty-printed JSON.
pub fn write_network(config: &NetworkConfig) -> Result<String, WriteError> {
    let doc = ir_to_document(config)?;
    Ok(serde_json::to_string_pretty(&doc)? + "\n")
}

/// Serialize a routing model to pretty-printed JSON.
pub fn write_routing(model: &RoutingModel) -> Result<String, WriteError> {
    Ok(serde_json::to_string_pretty(model)? + "\n")
}

/// Transform the IR back into the document model.
pub fn ir_to_document(config: &NetworkConfig) -> Result<JsonDocument, WriteError> {
    let modules = config
        .modules
        .iter()
        .map(module_to_json)
        .collect::<Result<Vec<_>, _>>()?;
    let routes = config
        .routes
        .iter()
        .map(|r| JsonRoute {
            from: r.from.clone(),
            to: r.to.clone(),
            name: r.name.clone(),
        })
        .collect();
    Ok(JsonDocument { modules, routes })
}

fn module_to_json(module: &ModuleDecl) -> Result<JsonModule, WriteError> {
    let fields = match module {
        ModuleDecl::DoIp(doip) => fields_of(&JsonDoIp {
            discovery: Some(doip.discovery.to_string()),
            max_connections: Some(doip.max_connections),
            extra: doip.extra.clone(),
        })?,
        ModuleDecl::SomeIp(someip) => fields_of(&JsonSomeIp {
            sd: Some(JsonSd {
                multicast: Some(someip.sd.multicast.to_string()),
                extra: someip.sd.extra.clone(),
            }),
            servers: someip.servers.iter().map(service_to_json).collect(),
            clients: someip.clients.iter().map(service_to_json).collect(),
            extra: someip.extra.clone(),
        })?,
        ModuleDecl::SoAd(soad) => fields_of(&JsonSoAd {
            sockets: soad.sockets.iter().map(socket_to_json).collect(),
            extra: soad.extra.clone(),
        })?,
        ModuleDecl::Unrecognized { extra, .. } => extra.clone().into_iter().collect(),
    };
    let class = match module {
        ModuleDecl::DoIp(_) => CLASS_DOIP,
        ModuleDecl::SomeIp(_) => CLASS_SOMEIP,
        ModuleDecl::SoAd(_) => CLASS_SOAD,
        ModuleDecl::Unrecognized { class, .. } => class.as_str(),
    };
    Ok(JsonModule {
        class: class.to_string(),
        fields,
    })
}

fn fields_of<T: Serialize>(body: &T) -> Result<Map<String, Value>, WriteError> {
    match serde_json::to_value(body)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn service_to_json(svc: &SomeIpService) -> JsonService {
    let (reliable, unreliable, listen) = match svc.quality {
        TransportQuality::Reliable { port, listen } => (Some(port), None, listen),
        TransportQuality::Unreliable { port } => (None, Some(port), None),
    };
    JsonService {
        name: Some(svc.name.clone()),
        reliable,
        unreliable,
        listen,
        extra: svc.extra.clone(),
    }
}

fn socket_to_json(sock: &SocketDescriptor) -> JsonSocket {
    let addr = Some(sock.endpoint.to_string());
    let (server, client) = match sock.role {
        SocketRole::Server => (addr, None),
        SocketRole::Client => (None, addr),
    };
    JsonSocket {
        name: Some(sock.name.clone()),
        server,
        client,
        protocol: Some(sock.protocol.as_str().to_string()),
        up: Some(sock.upper_layer.as_str().to_string()),
        rx_pdu_id: Some(sock.rx_pdu_id.clone()),
        listen: sock.listen,
        extra: sock.extra.clone(),
    }
}
