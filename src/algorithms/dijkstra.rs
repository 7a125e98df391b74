use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::network::NetworkModel;
use crate::RouterIndex;

/// Traversal rule applied by the path engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Topology and link weights only.
    #[default]
    Static,
    /// Like `Static`, but congested routers can be neither endpoint nor relay.
    Dynamic,
}

impl RoutingMode {
    /// Whether `router` may carry traffic under this mode. Used both for the
    /// endpoint check and while relaxing edges.
    pub fn admits(self, model: &NetworkModel, router: RouterIndex) -> bool {
        match self {
            RoutingMode::Static => true,
            RoutingMode::Dynamic => !model.is_congested(router),
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingMode::Static => write!(f, "Static Routing"),
            RoutingMode::Dynamic => write!(f, "Dynamic Routing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPath {
    /// Routers from source to destination, both included.
    pub path: Vec<RouterIndex>,
    pub cost: u64,
}

#[derive(Debug, PartialEq, Eq)]
struct State {
    cost: u64,
    router: RouterIndex,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.router.cmp(&other.router))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum-weight path from `source` to `destination`.
///
/// Returns `Ok(None)` when the destination is unreachable under `mode`, and
/// `RouteError::CongestedEndpoint` without searching when `mode` refuses
/// either endpoint. Weights are non-negative, which is what makes stopping
/// as soon as the destination leaves the frontier correct. When several
/// paths share the minimum cost, which one is returned is unspecified.
///
/// # Panics
///
/// Panics if `source` or `destination` is not a router index of `model`.
pub fn shortest_path(
    model: &NetworkModel,
    source: RouterIndex,
    destination: RouterIndex,
    mode: RoutingMode,
) -> Result<Option<ShortestPath>, RouteError> {
    let k = model.router_count();
    assert!(source < k && destination < k, "router index out of range");

    for endpoint in [source, destination] {
        if !mode.admits(model, endpoint) {
            return Err(RouteError::CongestedEndpoint { router: endpoint });
        }
    }

    let mut distances = vec![u64::MAX; k];
    let mut previous: Vec<Option<RouterIndex>> = vec![None; k];
    let mut frontier = BinaryHeap::new();

    distances[source] = 0;
    frontier.push(State {
        cost: 0,
        router: source,
    });

    // No decrease-key: improved routers are pushed again and the
    // outdated entries are dropped when popped.
    while let Some(State { cost, router }) = frontier.pop() {
        if router == destination {
            break;
        }

        if cost > distances[router] {
            continue;
        }

        for (neighbor, weight) in model.neighbors(router) {
            if !mode.admits(model, neighbor) {
                continue;
            }

            let candidate = cost.saturating_add(u64::from(weight));
            if candidate < distances[neighbor] {
                distances[neighbor] = candidate;
                previous[neighbor] = Some(router);
                frontier.push(State {
                    cost: candidate,
                    router: neighbor,
                });
            }
        }
    }

    if distances[destination] == u64::MAX {
        return Ok(None);
    }

    Ok(Some(ShortestPath {
        path: reconstruct_path(&previous, destination),
        cost: distances[destination],
    }))
}

fn reconstruct_path(previous: &[Option<RouterIndex>], destination: RouterIndex) -> Vec<RouterIndex> {
    let mut path = Vec::new();
    let mut current = Some(destination);

    while let Some(router) = current {
        path.push(router);
        current = previous[router];
    }

    path.reverse();
    path
}
