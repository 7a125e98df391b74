use std::fmt;

use log::debug;
use serde::Serialize;

use crate::algorithms::{shortest_path, RoutingMode};
use crate::error::RouteError;
use crate::network::{is_valid_address, NetworkModel};
use crate::RouterIndex;

/// Outcome of a successful query. An unreachable destination is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RouteResult {
    Path { path: Vec<String>, cost: u64 },
    NoPath,
}

impl RouteResult {
    pub fn path(&self) -> Option<&[String]> {
        match self {
            RouteResult::Path { path, .. } => Some(path),
            RouteResult::NoPath => None,
        }
    }

    pub fn cost(&self) -> Option<u64> {
        match self {
            RouteResult::Path { cost, .. } => Some(*cost),
            RouteResult::NoPath => None,
        }
    }
}

impl fmt::Display for RouteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteResult::Path { path, cost } => {
                write!(f, "Shortest Path: {}\nTotal Distance: {}", path.join(" -> "), cost)
            }
            RouteResult::NoPath => write!(f, "No path found."),
        }
    }
}

/// Resolves both addresses, runs the path engine and maps the resulting
/// router indices back to addresses.
pub fn route(
    model: &NetworkModel,
    source: &str,
    destination: &str,
    mode: RoutingMode,
) -> Result<RouteResult, RouteError> {
    let from = resolve(model, source)?;
    let to = resolve(model, destination)?;

    debug!("{} query {} ({}) -> {} ({})", mode, source, from, destination, to);

    let found = shortest_path(model, from, to, mode)?;

    let result = match found {
        Some(found) => RouteResult::Path {
            path: found
                .path
                .iter()
                .map(|&router| model.addresses()[router].clone())
                .collect(),
            cost: found.cost,
        },
        None => RouteResult::NoPath,
    };

    debug!("{} -> {}: {:?}", source, destination, result);
    Ok(result)
}

fn resolve(model: &NetworkModel, address: &str) -> Result<RouterIndex, RouteError> {
    if !is_valid_address(address) {
        return Err(RouteError::UnknownRouter(address.to_string()));
    }
    model
        .address_to_index(address)
        .ok_or_else(|| RouteError::UnknownRouter(address.to_string()))
}
