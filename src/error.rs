use thiserror::Error;

use crate::RouterIndex;

/// Rejection of a network description, raised at build time or when the
/// congestion vector is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("router count must be a positive integer")]
    EmptyNetwork,

    #[error("{matrix} matrix has {actual} rows, expected {expected}")]
    RowCount {
        matrix: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{matrix} matrix row {row} has {actual} columns, expected {expected}")]
    ColumnCount {
        matrix: &'static str,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("expected {expected} router addresses, got {actual}")]
    AddressCount { expected: usize, actual: usize },

    #[error("invalid router address {0:?}")]
    MalformedAddress(String),

    #[error("router address {0} is assigned more than once")]
    DuplicateAddress(String),

    #[error("congestion vector has {actual} entries, expected {expected}")]
    CongestionLength { expected: usize, actual: usize },

    #[error("congestion value {value} for router {router} must be 0 or 1")]
    CongestionValue { router: RouterIndex, value: u8 },
}

/// Per-query failure. Neither variant invalidates the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Source or destination IP not found in router IPs: {0}")]
    UnknownRouter(String),

    #[error("Path cannot be found as the source or destination router is congested.")]
    CongestedEndpoint { router: RouterIndex },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read network config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse network config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
