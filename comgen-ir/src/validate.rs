use crate::types::{ModuleDecl, NetworkConfig, Route, RoutingModel};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} socket-adaptation modules declared, at most one is allowed")]
    MultipleSoAd(usize),
    #[error("duplicate socket name '{0}'")]
    DuplicateSocketName(String),
    #[error("duplicate SOME/IP {0} '{1}'")]
    DuplicateServiceName(&'static str, String),
    #[error("DoIP module allows no connections")]
    NoDoIpConnections,
    #[error("duplicate route {0}")]
    DuplicateRoute(String),
    #[error("empty PDU name in route from {0} to {1}")]
    EmptyPduName(String, String),
    #[error("gateway buffer '{0}' is shared by more than one route")]
    DuplicateBufferName(String),
}

/// Validate a configuration (or a completed one) for structural consistency.
pub fn validate_network(config: &NetworkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let soad_count = config
        .modules
        .iter()
        .filter(|m| matches!(m, ModuleDecl::SoAd(_)))
        .count();
    if soad_count > 1 {
        errors.push(ValidationError::MultipleSoAd(soad_count));
    }

    for module in &config.modules {
        match module {
            ModuleDecl::DoIp(doip) if doip.max_connections == 0 => {
                errors.push(ValidationError::NoDoIpConnections);
            }
            ModuleDecl::SomeIp(someip) => {
                for (kind, services) in [("server", &someip.servers), ("client", &someip.clients)] {
                    let mut names = HashSet::new();
                    for svc in services {
                        if !names.insert(svc.name.as_str()) {
                            errors.push(ValidationError::DuplicateServiceName(
                                kind,
                                svc.name.clone(),
                            ));
                        }
                    }
                }
            }
            ModuleDecl::SoAd(soad) => {
                let mut names = HashSet::new();
                for sock in &soad.sockets {
                    if !names.insert(sock.name.as_str()) {
                        errors.push(ValidationError::DuplicateSocketName(sock.name.clone()));
                    }
                }
            }
            _ => {}
        }
    }

    validate_routes(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Duplicate triples compile fine but collide in the emitted symbol names.
fn validate_routes(routes: &[Route], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for rt in routes {
        if rt.name.is_empty() {
            errors.push(ValidationError::EmptyPduName(rt.from.clone(), rt.to.clone()));
        }
        if !seen.insert((rt.from.as_str(), rt.to.as_str(), rt.name.as_str())) {
            errors.push(ValidationError::DuplicateRoute(rt.to_string()));
        }
    }
}

/// Check a derived routing model: gateway buffers are named after their
/// PDU, so two gateway routes carrying the same PDU name collide.
pub fn validate_routing(model: &RoutingModel) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    for buf in &model.buffers {
        if !names.insert(buf.name.as_str()) {
            errors.push(ValidationError::DuplicateBufferName(buf.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
