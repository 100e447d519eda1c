use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Attributes a declaration carries that the compiler does not interpret.
/// They are kept verbatim so downstream emitters still see them.
pub type Extra = BTreeMap<String, Value>;

/// Listen backlog of a reliable SOME/IP server without an explicit `listen`.
pub const DEFAULT_LISTEN_BACKLOG: u32 = 3;

// --- Top-level ---

/// Root input model: transport module declarations plus PDU routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub modules: Vec<ModuleDecl>,
    pub routes: Vec<Route>,
}

impl NetworkConfig {
    pub fn soad(&self) -> Option<&SoAdModule> {
        self.modules.iter().find_map(|m| match m {
            ModuleDecl::SoAd(soad) => Some(soad),
            _ => None,
        })
    }

    pub fn soad_mut(&mut self) -> Option<&mut SoAdModule> {
        self.modules.iter_mut().find_map(|m| match m {
            ModuleDecl::SoAd(soad) => Some(soad),
            _ => None,
        })
    }

    pub fn someip(&self) -> Option<&SomeIpModule> {
        self.modules.iter().find_map(|m| match m {
            ModuleDecl::SomeIp(someip) => Some(someip),
            _ => None,
        })
    }

    /// All sockets currently held by the socket-adaptation module.
    pub fn sockets(&self) -> &[SocketDescriptor] {
        self.soad().map_or(&[], |s| s.sockets.as_slice())
    }
}

// --- Module declarations ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleDecl {
    DoIp(DoIpModule),
    SomeIp(SomeIpModule),
    SoAd(SoAdModule),
    /// A `class` the registry does not know. Kept so synthesis can name it.
    Unrecognized { class: String, extra: Extra },
}

impl ModuleDecl {
    pub fn class_name(&self) -> &str {
        match self {
            ModuleDecl::DoIp(_) => crate::registry::CLASS_DOIP,
            ModuleDecl::SomeIp(_) => crate::registry::CLASS_SOMEIP,
            ModuleDecl::SoAd(_) => crate::registry::CLASS_SOAD,
            ModuleDecl::Unrecognized { class, .. } => class,
        }
    }
}

/// Diagnostic-over-IP transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoIpModule {
    pub discovery: Endpoint,
    pub max_connections: u32,
    pub extra: Extra,
}

/// Service discovery + SOME/IP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomeIpModule {
    pub sd: SdConfig,
    pub servers: Vec<SomeIpService>,
    pub clients: Vec<SomeIpService>,
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdConfig {
    pub multicast: Ipv4Addr,
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomeIpService {
    pub name: String,
    pub quality: TransportQuality,
    pub extra: Extra,
}

/// How a SOME/IP service is carried. Decided once when the document is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportQuality {
    /// TCP. `listen` is the backlog as declared, if it was.
    Reliable { port: u16, listen: Option<u32> },
    /// UDP.
    Unreliable { port: u16 },
}

impl TransportQuality {
    pub fn port(&self) -> u16 {
        match self {
            TransportQuality::Reliable { port, .. } | TransportQuality::Unreliable { port } => *port,
        }
    }

    pub fn protocol(&self) -> SocketProtocol {
        match self {
            TransportQuality::Reliable { .. } => SocketProtocol::Tcp,
            TransportQuality::Unreliable { .. } => SocketProtocol::Udp,
        }
    }

    /// Backlog a server socket listens with; `None` for datagram services.
    pub fn listen_backlog(&self) -> Option<u32> {
        match self {
            TransportQuality::Reliable { listen, .. } => {
                Some(listen.unwrap_or(DEFAULT_LISTEN_BACKLOG))
            }
            TransportQuality::Unreliable { .. } => None,
        }
    }
}

/// Socket adaptation: the single owner of every socket in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SoAdModule {
    pub sockets: Vec<SocketDescriptor>,
    pub extra: Extra,
}

// --- Sockets ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketDescriptor {
    pub name: String,
    pub role: SocketRole,
    pub endpoint: Endpoint,
    pub protocol: SocketProtocol,
    pub upper_layer: UpperLayer,
    pub rx_pdu_id: String,
    pub listen: Option<u32>,
    pub extra: Extra,
}

/// Server sockets bind a local address, client sockets target a remote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketRole {
    Server,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketProtocol {
    Tcp,
    Udp,
}

impl SocketProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocketProtocol::Tcp => "TCP",
            SocketProtocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for SocketProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocketProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TCP" => Ok(SocketProtocol::Tcp),
            "UDP" => Ok(SocketProtocol::Udp),
            other => Err(format!("unknown socket protocol '{other}', expected TCP or UDP")),
        }
    }
}

/// Module a socket delivers received PDUs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpperLayer {
    DoIp,
    Sd,
    SomeIp,
    Other(String),
}

impl UpperLayer {
    pub fn as_str(&self) -> &str {
        match self {
            UpperLayer::DoIp => "DoIP",
            UpperLayer::Sd => "SD",
            UpperLayer::SomeIp => "SOMEIP",
            UpperLayer::Other(tag) => tag,
        }
    }
}

impl fmt::Display for UpperLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for UpperLayer {
    fn from(tag: &str) -> Self {
        match tag {
            "DoIP" => UpperLayer::DoIp,
            "SD" => UpperLayer::Sd,
            "SOMEIP" => UpperLayer::SomeIp,
            other => UpperLayer::Other(other.to_string()),
        }
    }
}

/// IPv4 address and port. A missing address is the unspecified address,
/// written `NULL` in configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub address: Option<Ipv4Addr>,
    pub port: u16,
}

impl Endpoint {
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self {
            address: Some(address),
            port,
        }
    }

    pub fn unspecified(port: u16) -> Self {
        Self {
            address: None,
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(addr) => write!(f, "{addr}:{}", self.port),
            None => write!(f, "NULL:{}", self.port),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointParseError {
    #[error("endpoint '{0}' is not of the form <address>:<port>")]
    MissingPort(String),
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, port) = s
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(s.to_string()))?;
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| EndpointParseError::InvalidPort(port.to_string()))?;
        let addr = addr.trim();
        if addr == "NULL" {
            return Ok(Endpoint::unspecified(port));
        }
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| EndpointParseError::InvalidAddress(addr.to_string()))?;
        Ok(Endpoint::new(addr, port))
    }
}

// --- Routing ---

/// A directed PDU flow between two route modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub from: String,
    pub to: String,
    pub name: String,
}

impl Route {
    pub fn new(from: &str, to: &str, name: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDU {} from {} to {}", self.name, self.from, self.to)
    }
}

/// Which fixed module set a route module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleLayer {
    /// Consumes high-priority routes (diagnostics).
    Application,
    /// Transport protocols; pairs of them form gateway routes.
    Transport,
    /// Link layer interfaces.
    Link,
}

/// Routing table entry derived for one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingPath {
    pub ordinal: usize,
    pub pdu: String,
    pub source: PduRef,
    pub destinations: Vec<PduRef>,
    /// Index into [`RoutingModel::buffers`] for gateway routes.
    pub buffer: Option<usize>,
}

/// One end of a routing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PduRef {
    pub module: String,
    /// `PDUR_MODULE_<MODULE>`
    pub module_id: String,
    /// `<MODULE>_<pdu>`
    pub pdu_index: String,
    /// `PduR_<Module>Api`
    pub api_table: String,
}

impl PduRef {
    pub fn new(module: &str, pdu: &str) -> Self {
        let upper = module.to_uppercase();
        Self {
            module: module.to_string(),
            module_id: format!("PDUR_MODULE_{upper}"),
            pdu_index: format!("{upper}_{pdu}"),
            api_table: format!("PduR_{module}Api"),
        }
    }
}

/// Reassembly buffer of a gateway route. Starts unallocated (no storage,
/// length 0, nothing used); the runtime assigns storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferDescriptor {
    pub name: String,
    pub length: usize,
    pub used: usize,
}

impl BufferDescriptor {
    pub fn unallocated(pdu: &str) -> Self {
        Self {
            name: pdu.to_string(),
            length: 0,
            used: 0,
        }
    }
}

/// Start offset of a module's segment in the routing table, or `-1` when
/// the module has no segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaseId(pub Option<usize>);

impl BaseId {
    pub const NONE: BaseId = BaseId(None);

    pub fn value(&self) -> i64 {
        self.0.map_or(-1, |v| v as i64)
    }
}

impl fmt::Display for BaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for BaseId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value())
    }
}

impl<'de> Deserialize<'de> for BaseId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = i64::deserialize(deserializer)?;
        Ok(BaseId(usize::try_from(v).ok()))
    }
}

/// Named base offsets the dispatch layer adds to module-local PDU ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BaseIds {
    pub dcm_tx: BaseId,
    pub doip_rx: BaseId,
    pub doip_tx: BaseId,
    pub cantp_rx: BaseId,
    pub cantp_tx: BaseId,
}

/// Dispatch callbacks of one module. `None` slots are bound to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApiTable {
    pub start_of_reception: Option<String>,
    pub copy_rx_data: Option<String>,
    pub rx_indication: Option<String>,
    pub transmit: Option<String>,
    pub copy_tx_data: Option<String>,
    pub tx_confirmation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiBinding {
    pub module: String,
    pub layer: ModuleLayer,
    pub has_cfg_header: bool,
    pub table: ApiTable,
}

/// Everything the dispatch-table emitter needs, derived from the routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RoutingModel {
    pub paths: Vec<RoutingPath>,
    pub buffers: Vec<BufferDescriptor>,
    pub base_ids: BaseIds,
    pub use_tp_gateway: bool,
    pub api_bindings: Vec<ApiBinding>,
}

impl RoutingModel {
    pub fn buffer_of(&self, path: &RoutingPath) -> Option<&BufferDescriptor> {
        path.buffer.and_then(|i| self.buffers.get(i))
    }
}
