//! Route classification and routing table derivation.
//!
//! Routes are grouped by source module, then split into a `high` bucket
//! (destination is an application module) and a `low` bucket (everything
//! else), then grouped by destination. The table walk over these groups
//! fixes the ordinal of every routing path; base ids are offsets into that
//! same walk, so both are computed from [`RoutingGroups::walk`].

use crate::error::CompileError;
use crate::registry::{self, MODULE_CANTP, MODULE_DCM, MODULE_DOIP, RouteModule};
use crate::types::{
    ApiBinding, ApiTable, BaseId, BaseIds, BufferDescriptor, ModuleLayer, PduRef, Route,
    RoutingModel, RoutingPath,
};

/// Routes sharing one destination module, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationGroup {
    pub destination: String,
    pub routes: Vec<Route>,
}

/// Routes sharing one source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub source: String,
    pub high: Vec<DestinationGroup>,
    pub low: Vec<DestinationGroup>,
}

impl SourceGroup {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            high: Vec::new(),
            low: Vec::new(),
        }
    }

    /// Destination groups in walk order: `high` first, then `low`.
    pub fn destinations(&self) -> impl Iterator<Item = &DestinationGroup> {
        self.high.iter().chain(self.low.iter())
    }
}

/// Classified routes. Every ordering here is first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingGroups {
    pub groups: Vec<SourceGroup>,
    /// Every module named as source or destination.
    pub modules: Vec<String>,
}

/// One route as reached by the table walk.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub ordinal: usize,
    pub source: &'a str,
    pub destination: &'a str,
    pub route: &'a Route,
    /// First route of its source group.
    pub opens_source: bool,
    /// First route of its destination group.
    pub opens_destination: bool,
}

impl RoutingGroups {
    pub fn route_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(SourceGroup::destinations)
            .map(|d| d.routes.len())
            .sum()
    }

    /// Walk every route: source groups, then `high` before `low`, then
    /// destination groups, then routes. Ordinals count routes, not groups.
    pub fn walk(&self) -> Vec<Visit<'_>> {
        let mut visits = Vec::with_capacity(self.route_count());
        for group in &self.groups {
            let mut opens_source = true;
            for dest in group.destinations() {
                for (i, route) in dest.routes.iter().enumerate() {
                    let ordinal = visits.len();
                    visits.push(Visit {
                        ordinal,
                        source: &group.source,
                        destination: &dest.destination,
                        route,
                        opens_source,
                        opens_destination: i == 0,
                    });
                    opens_source = false;
                }
            }
        }
        visits
    }
}

/// Group routes by source module and destination priority.
///
/// No route is dropped or merged; duplicate triples stay separate entries.
pub fn classify_routes(routes: &[Route]) -> RoutingGroups {
    let mut groups: Vec<SourceGroup> = Vec::new();
    let mut modules: Vec<String> = Vec::new();

    for rt in routes {
        let idx = match groups.iter().position(|g| g.source == rt.from) {
            Some(idx) => idx,
            None => {
                groups.push(SourceGroup::new(&rt.from));
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        let bucket = if registry::is_application_module(&rt.to) {
            &mut group.high
        } else {
            &mut group.low
        };
        match bucket.iter_mut().find(|d| d.destination == rt.to) {
            Some(dest) => dest.routes.push(rt.clone()),
            None => bucket.push(DestinationGroup {
                destination: rt.to.clone(),
                routes: vec![rt.clone()],
            }),
        }

        for module in [&rt.from, &rt.to] {
            if !modules.contains(module) {
                modules.push(module.clone());
            }
        }
    }

    RoutingGroups { groups, modules }
}

/// Filter of a base id query. Callers name either source or destination
/// modules, never both.
#[derive(Debug, Clone, Copy)]
pub enum BaseIdQuery<'a> {
    From(&'a [&'a str]),
    To(&'a [&'a str]),
}

/// Offset of the first table segment belonging to the filtered modules.
///
/// A source match is taken at the boundary of its source group and a
/// destination match at the boundary of its destination group, before any
/// of that group's own routes are counted. The result is where the segment
/// starts; its length is the caller's business.
pub fn base_id(groups: &RoutingGroups, query: BaseIdQuery<'_>) -> BaseId {
    groups
        .walk()
        .into_iter()
        .find(|v| match query {
            BaseIdQuery::From(mods) => v.opens_source && mods.contains(&v.source),
            BaseIdQuery::To(mods) => v.opens_destination && mods.contains(&v.destination),
        })
        .map_or(BaseId::NONE, |v| BaseId(Some(v.ordinal)))
}

pub fn compute_base_ids(groups: &RoutingGroups) -> BaseIds {
    BaseIds {
        dcm_tx: base_id(groups, BaseIdQuery::From(&[MODULE_DCM])),
        doip_rx: base_id(groups, BaseIdQuery::From(&[MODULE_DOIP])),
        doip_tx: base_id(groups, BaseIdQuery::To(&[MODULE_DOIP])),
        cantp_rx: base_id(groups, BaseIdQuery::From(&[MODULE_CANTP])),
        cantp_tx: base_id(groups, BaseIdQuery::To(&[MODULE_CANTP])),
    }
}

/// Both ends are transport protocols: the router reassembles and forwards.
pub fn is_gateway_route(route: &Route) -> bool {
    registry::is_transport_module(&route.from) && registry::is_transport_module(&route.to)
}

pub fn uses_tp_gateway(routes: &[Route]) -> bool {
    routes.iter().any(is_gateway_route)
}

fn api_binding(module: &RouteModule, gateway: bool) -> ApiBinding {
    let name = module.name;
    let transmit = module.transmit.map(str::to_string);
    let table = match module.layer {
        ModuleLayer::Application => ApiTable {
            start_of_reception: Some(format!("{name}_StartOfReception")),
            copy_rx_data: Some(format!("{name}_CopyRxData")),
            rx_indication: Some(format!("{name}_TpRxIndication")),
            transmit,
            copy_tx_data: Some(format!("{name}_CopyTxData")),
            tx_confirmation: Some(format!("{name}_TpTxConfirmation")),
        },
        ModuleLayer::Transport => {
            let gw = |slot: &str| gateway.then(|| format!("PduR_{name}Gw{slot}"));
            ApiTable {
                start_of_reception: gw("StartOfReception"),
                copy_rx_data: gw("CopyRxData"),
                rx_indication: gw("RxIndication"),
                transmit,
                copy_tx_data: gw("CopyTxData"),
                tx_confirmation: gw("TxConfirmation"),
            }
        }
        ModuleLayer::Link => ApiTable {
            transmit,
            ..ApiTable::default()
        },
    };

    ApiBinding {
        module: name.to_string(),
        layer: module.layer,
        has_cfg_header: module.layer != ModuleLayer::Application,
        table,
    }
}

fn resolve_bindings(
    groups: &RoutingGroups,
    routes: &[Route],
    gateway: bool,
) -> Result<Vec<ApiBinding>, CompileError> {
    groups
        .modules
        .iter()
        .map(|name| match registry::lookup_route_module(name) {
            Some(module) => Ok(api_binding(module, gateway)),
            None => {
                let route = routes
                    .iter()
                    .find(|r| &r.from == name || &r.to == name)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                Err(CompileError::UnknownModule {
                    module: name.clone(),
                    route,
                })
            }
        })
        .collect()
}

/// Derive the full routing model from the declared routes.
pub fn compile_routing(routes: &[Route]) -> Result<RoutingModel, CompileError> {
    let groups = classify_routes(routes);
    let use_tp_gateway = uses_tp_gateway(routes);
    let api_bindings = resolve_bindings(&groups, routes, use_tp_gateway)?;

    let mut paths = Vec::with_capacity(routes.len());
    let mut buffers = Vec::new();
    for visit in groups.walk() {
        let rt = visit.route;
        let buffer = if is_gateway_route(rt) {
            buffers.push(BufferDescriptor::unallocated(&rt.name));
            Some(buffers.len() - 1)
        } else {
            None
        };
        paths.push(RoutingPath {
            ordinal: visit.ordinal,
            pdu: rt.name.clone(),
            source: PduRef::new(&rt.from, &rt.name),
            destinations: vec![PduRef::new(&rt.to, &rt.name)],
            buffer,
        });
    }

    let base_ids = compute_base_ids(&groups);
    log::debug!(
        "routing: {} paths, {} gateway buffers, {} modules, gateway={}",
        paths.len(),
        buffers.len(),
        api_bindings.len(),
        use_tp_gateway
    );

    Ok(RoutingModel {
        paths,
        buffers,
        base_ids,
        use_tp_gateway,
        api_bindings,
    })
}
