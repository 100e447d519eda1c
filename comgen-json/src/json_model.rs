//! Serde-deserializable types matching the network configuration document.
//!
//! Field names follow the document (`Modules`, `SD`, `RxPduId`, ...). Fields
//! the compiler needs are `Option` so the parser can report which one is
//! missing; everything else lands in `extra` and is written back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Root document
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonDocument {
    #[serde(rename = "Modules", default)]
    pub modules: Vec<JsonModule>,
    #[serde(default, alias = "routines", skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<JsonRoute>,
}

/// A module declaration before its class is looked at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonModule {
    pub class: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRoute {
    pub from: String,
    pub to: String,
    pub name: String,
}

// --- Class-specific bodies ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonDoIp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonSomeIp {
    #[serde(rename = "SD", default, skip_serializing_if = "Option::is_none")]
    pub sd: Option<JsonSd>,
    #[serde(default)]
    pub servers: Vec<JsonService>,
    #[serde(default)]
    pub clients: Vec<JsonService>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonSd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliable: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unreliable: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonSoAd {
    #[serde(default)]
    pub sockets: Vec<JsonSocket>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One socket in the socket-adaptation module. Exactly one of `server`
/// (local bind address) and `client` (remote address) is set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonSocket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,
    #[serde(rename = "RxPduId", default, skip_serializing_if = "Option::is_none")]
    pub rx_pdu_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
