use std::collections::HashMap;

use serde::Serialize;

use super::address::is_valid_address;
use crate::error::ValidationError;
use crate::RouterIndex;

/// An undirected link as read from the upper triangle of the adjacency matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub from: RouterIndex,
    pub to: RouterIndex,
    pub weight: u32,
}

/// Router graph: adjacency, link weights, addresses and congestion flags.
///
/// Everything except the congestion vector is fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkModel {
    adjacency: Vec<Vec<u32>>,
    weights: Vec<Vec<u32>>,
    addresses: Vec<String>,
    index_by_address: HashMap<String, RouterIndex>,
    congestion: Vec<bool>,
}

impl NetworkModel {
    pub fn build(
        router_count: usize,
        adjacency: Vec<Vec<u32>>,
        weights: Vec<Vec<u32>>,
        addresses: Vec<String>,
        congestion: &[u8],
    ) -> Result<Self, ValidationError> {
        if router_count == 0 {
            return Err(ValidationError::EmptyNetwork);
        }

        check_square("adjacency", &adjacency, router_count)?;
        check_square("weight", &weights, router_count)?;

        if addresses.len() != router_count {
            return Err(ValidationError::AddressCount {
                expected: router_count,
                actual: addresses.len(),
            });
        }

        let mut index_by_address = HashMap::with_capacity(router_count);
        for (index, address) in addresses.iter().enumerate() {
            if !is_valid_address(address) {
                return Err(ValidationError::MalformedAddress(address.clone()));
            }
            if index_by_address.insert(address.clone(), index).is_some() {
                return Err(ValidationError::DuplicateAddress(address.clone()));
            }
        }

        let congestion = parse_congestion(congestion, router_count)?;

        Ok(Self {
            adjacency,
            weights,
            addresses,
            index_by_address,
            congestion,
        })
    }

    /// Replaces the congestion vector. On error the previous vector is kept.
    pub fn set_congestion(&mut self, congestion: &[u8]) -> Result<(), ValidationError> {
        self.congestion = parse_congestion(congestion, self.router_count())?;
        Ok(())
    }

    pub fn address_to_index(&self, address: &str) -> Option<RouterIndex> {
        self.index_by_address.get(address).copied()
    }

    pub fn address_of(&self, router: RouterIndex) -> Option<&str> {
        self.addresses.get(router).map(String::as_str)
    }

    pub fn router_count(&self) -> usize {
        self.addresses.len()
    }

    pub fn adjacency(&self) -> &[Vec<u32>] {
        &self.adjacency
    }

    pub fn weights(&self) -> &[Vec<u32>] {
        &self.weights
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn congestion(&self) -> &[bool] {
        &self.congestion
    }

    /// Congestion flags in their 0/1 input form.
    pub fn congestion_flags(&self) -> Vec<u8> {
        self.congestion.iter().map(|&c| u8::from(c)).collect()
    }

    pub fn is_congested(&self, router: RouterIndex) -> bool {
        self.congestion.get(router).copied().unwrap_or(false)
    }

    /// # Panics
    ///
    /// Panics if `from` or `to` is not a router index of this model.
    pub fn is_linked(&self, from: RouterIndex, to: RouterIndex) -> bool {
        self.adjacency[from][to] > 0
    }

    /// Weight of the directed edge, whether or not the link exists.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is not a router index of this model.
    pub fn weight(&self, from: RouterIndex, to: RouterIndex) -> u32 {
        self.weights[from][to]
    }

    /// Directed out-links of `router` with their weights, in index order.
    ///
    /// # Panics
    ///
    /// Panics if `router` is not a router index of this model.
    pub fn neighbors(&self, router: RouterIndex) -> impl Iterator<Item = (RouterIndex, u32)> + '_ {
        self.adjacency[router]
            .iter()
            .enumerate()
            .filter(|&(_, &link)| link > 0)
            .map(move |(to, _)| (to, self.weights[router][to]))
    }

    pub fn links(&self) -> Vec<Link> {
        let k = self.router_count();
        let mut links = Vec::new();
        for from in 0..k {
            for to in (from + 1)..k {
                if self.is_linked(from, to) {
                    links.push(Link {
                        from,
                        to,
                        weight: self.weight(from, to),
                    });
                }
            }
        }
        links
    }

    pub fn congested_routers(&self) -> Vec<RouterIndex> {
        self.congestion
            .iter()
            .enumerate()
            .filter_map(|(router, &congested)| congested.then_some(router))
            .collect()
    }

    /// Tab-separated adjacency matrix, one row per line.
    pub fn render_adjacency(&self) -> String {
        self.adjacency
            .iter()
            .map(|row| {
                row.iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn check_square(
    matrix: &'static str,
    rows: &[Vec<u32>],
    k: usize,
) -> Result<(), ValidationError> {
    if rows.len() != k {
        return Err(ValidationError::RowCount {
            matrix,
            expected: k,
            actual: rows.len(),
        });
    }
    for (row, cols) in rows.iter().enumerate() {
        if cols.len() != k {
            return Err(ValidationError::ColumnCount {
                matrix,
                row,
                expected: k,
                actual: cols.len(),
            });
        }
    }
    Ok(())
}

fn parse_congestion(flags: &[u8], k: usize) -> Result<Vec<bool>, ValidationError> {
    if flags.len() != k {
        return Err(ValidationError::CongestionLength {
            expected: k,
            actual: flags.len(),
        });
    }
    flags
        .iter()
        .enumerate()
        .map(|(router, &value)| match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ValidationError::CongestionValue { router, value }),
        })
        .collect()
}
