use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use log::info;

use crate::error::ConfigError;
use crate::network::NetworkModel;

/// On-disk description of a router network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub router_count: usize,
    pub adjacency: Vec<Vec<u32>>,
    pub weights: Vec<Vec<u32>>,
    pub addresses: Vec<String>,
    /// One 0/1 flag per router; all clear when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub congestion: Option<Vec<u8>>,
}

impl NetworkConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: NetworkConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_model(model: &NetworkModel) -> Self {
        Self {
            router_count: model.router_count(),
            adjacency: model.adjacency().to_vec(),
            weights: model.weights().to_vec(),
            addresses: model.addresses().to_vec(),
            congestion: Some(model.congestion_flags()),
        }
    }

    pub fn into_model(self) -> Result<NetworkModel, ConfigError> {
        // Sized from the matrix so a bogus router_count reaches build's checks.
        let congestion = self
            .congestion
            .unwrap_or_else(|| vec![0; self.adjacency.len()]);
        let model = NetworkModel::build(
            self.router_count,
            self.adjacency,
            self.weights,
            self.addresses,
            &congestion,
        )?;
        info!(
            "Network built: {} routers, {} links, {} congested",
            model.router_count(),
            model.links().len(),
            model.congested_routers().len()
        );
        Ok(model)
    }
}
