pub mod algorithms;
pub mod config;
pub mod control_server;
pub mod error;
pub mod network;
pub mod routing;

use std::sync::Arc;
use tokio::sync::RwLock;

pub use algorithms::RoutingMode;
pub use config::NetworkConfig;
pub use error::{ConfigError, RouteError, ValidationError};
pub use network::NetworkModel;
pub use routing::{route, RouteResult};

/// Zero-based router position in the adjacency and weight matrices.
pub type RouterIndex = usize;

/// Model shared between concurrent queries. Only the congestion vector is
/// ever written through the lock.
pub type SharedNetwork = Arc<RwLock<NetworkModel>>;
