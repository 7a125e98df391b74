use crate::algorithms::RoutingMode;
use crate::error::RouteError;
use crate::routing::route;
use crate::SharedNetwork;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Serialize, Deserialize)]
pub struct ControlResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ControlCommand {
    pub command: String,
    pub args: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RouteArgs {
    source: String,
    destination: String,
    #[serde(default)]
    mode: RoutingMode,
}

#[derive(Debug, Deserialize)]
struct CongestionArgs {
    congestion: Vec<u8>,
}

impl ControlResponse {
    fn ok(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Line-oriented JSON control channel in front of a shared network model.
pub struct ControlServer {
    port: u16,
    network: SharedNetwork,
    started_at: DateTime<Utc>,
}

impl ControlServer {
    pub fn new(port: u16, network: SharedNetwork) -> Self {
        Self {
            port,
            network,
            started_at: Utc::now(),
        }
    }

    pub async fn start(&self) -> anyhow::Result<()> {
        let bind_addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Control server listening on {}", bind_addr);
        self.serve(listener).await
    }

    /// Accepts clients on an already bound listener until the task is dropped.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Control connection from {}", addr);
                    let network = self.network.clone();
                    let started_at = self.started_at;
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, network, started_at).await {
                            error!("Error handling control client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept control connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(
        mut stream: TcpStream,
        network: SharedNetwork,
        started_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let (reader, mut writer) = stream.split();
        let mut buf_reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            match buf_reader.read_line(&mut line).await {
                Ok(0) => break, // Connection closed
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let response = match serde_json::from_str::<ControlCommand>(trimmed) {
                        Ok(command) => Self::process_command(command, &network, started_at).await,
                        Err(e) => ControlResponse::failed(format!("Invalid JSON command: {}", e)),
                    };

                    let response_json = serde_json::to_string(&response)?;
                    writer.write_all(format!("{}\n", response_json).as_bytes()).await?;
                    writer.flush().await?;
                }
                Err(e) => {
                    error!("Error reading from control client: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    pub async fn process_command(
        command: ControlCommand,
        network: &SharedNetwork,
        started_at: DateTime<Utc>,
    ) -> ControlResponse {
        debug!("Control command: {}", command.command);
        match command.command.as_str() {
            "status" => Self::get_status(network, started_at).await,
            "topology" => Self::get_topology(network).await,
            "route" => Self::compute_route(command.args, network).await,
            "set_congestion" => Self::set_congestion(command.args, network).await,
            "help" => Self::get_help(),
            _ => ControlResponse::failed(format!("Unknown command: {}", command.command)),
        }
    }

    async fn get_status(network: &SharedNetwork, started_at: DateTime<Utc>) -> ControlResponse {
        let model = network.read().await;
        let uptime = Utc::now().signed_duration_since(started_at);
        ControlResponse::ok(
            "Status retrieved",
            json!({
                "router_count": model.router_count(),
                "link_count": model.links().len(),
                "congested": model.congested_routers(),
                "started_at": started_at,
                "uptime_secs": uptime.num_seconds(),
            }),
        )
    }

    async fn get_topology(network: &SharedNetwork) -> ControlResponse {
        let model = network.read().await;
        ControlResponse::ok(
            format!("{} routers", model.router_count()),
            json!({
                "addresses": model.addresses(),
                "links": model.links(),
                "congestion": model.congestion_flags(),
            }),
        )
    }

    async fn compute_route(
        args: Option<serde_json::Value>,
        network: &SharedNetwork,
    ) -> ControlResponse {
        let args: RouteArgs = match args.map(serde_json::from_value) {
            Some(Ok(args)) => args,
            Some(Err(e)) => return ControlResponse::failed(format!("Invalid route arguments: {}", e)),
            None => return ControlResponse::failed("source and destination parameters required"),
        };

        let model = network.read().await;
        match route(&model, &args.source, &args.destination, args.mode) {
            Ok(result) => ControlResponse::ok(result.to_string(), json!(result)),
            Err(e) => {
                let kind = match e {
                    RouteError::UnknownRouter(_) => "unknown_router",
                    RouteError::CongestedEndpoint { .. } => "congested_endpoint",
                };
                ControlResponse {
                    success: false,
                    message: e.to_string(),
                    data: Some(json!({ "error": kind })),
                }
            }
        }
    }

    async fn set_congestion(
        args: Option<serde_json::Value>,
        network: &SharedNetwork,
    ) -> ControlResponse {
        let args: CongestionArgs = match args.map(serde_json::from_value) {
            Some(Ok(args)) => args,
            Some(Err(e)) => {
                return ControlResponse::failed(format!("Invalid congestion arguments: {}", e));
            }
            None => return ControlResponse::failed("congestion parameter required"),
        };

        let mut model = network.write().await;
        match model.set_congestion(&args.congestion) {
            Ok(()) => {
                info!("Congestion updated: {:?}", model.congested_routers());
                ControlResponse::ok(
                    "Congestion updated",
                    json!({ "congested": model.congested_routers() }),
                )
            }
            Err(e) => {
                warn!("Rejected congestion update: {}", e);
                ControlResponse::failed(e.to_string())
            }
        }
    }

    fn get_help() -> ControlResponse {
        let commands = [
            ("status", "Get router count, link count, congested routers and uptime"),
            ("topology", "Get router addresses, links and congestion flags"),
            ("route", "Shortest path (requires source, destination, optional mode)"),
            ("set_congestion", "Replace the congestion vector (requires congestion)"),
            ("help", "Show this help message"),
        ];

        ControlResponse::ok("Available commands", json!(commands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkModel;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn shared_square() -> SharedNetwork {
        let ring = vec![
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
        ];
        let addresses = (1..=4).map(|i| format!("10.0.0.{i}")).collect();
        let model = NetworkModel::build(4, ring.clone(), ring, addresses, &[0; 4]).unwrap();
        Arc::new(RwLock::new(model))
    }

    async fn send(network: &SharedNetwork, command: &str, args: serde_json::Value) -> ControlResponse {
        let command = ControlCommand {
            command: command.to_string(),
            args: (!args.is_null()).then_some(args),
        };
        ControlServer::process_command(command, network, Utc::now()).await
    }

    #[tokio::test]
    async fn route_then_congest_then_reroute() {
        let network = shared_square();

        let response = send(
            &network,
            "set_congestion",
            json!({ "congestion": [0, 1, 0, 0] }),
        )
        .await;
        assert!(response.success);

        let response = send(
            &network,
            "route",
            json!({ "source": "10.0.0.1", "destination": "10.0.0.3", "mode": "dynamic" }),
        )
        .await;
        assert!(response.success, "{}", response.message);
        assert_eq!(
            response.data.unwrap(),
            json!({
                "result": "path",
                "path": ["10.0.0.1", "10.0.0.4", "10.0.0.3"],
                "cost": 2
            })
        );
    }

    #[tokio::test]
    async fn route_errors_carry_a_kind() {
        let network = shared_square();
        send(&network, "set_congestion", json!({ "congestion": [0, 1, 0, 0] })).await;

        let response = send(
            &network,
            "route",
            json!({ "source": "10.0.0.1", "destination": "10.0.0.2", "mode": "dynamic" }),
        )
        .await;
        assert!(!response.success);
        assert_eq!(response.data.unwrap(), json!({ "error": "congested_endpoint" }));

        let response = send(
            &network,
            "route",
            json!({ "source": "256.1.1.1", "destination": "10.0.0.1" }),
        )
        .await;
        assert!(!response.success);
        assert_eq!(response.data.unwrap(), json!({ "error": "unknown_router" }));
    }

    #[tokio::test]
    async fn rejects_bad_congestion_and_unknown_commands() {
        let network = shared_square();

        let response = send(&network, "set_congestion", json!({ "congestion": [0, 2, 0, 0] })).await;
        assert!(!response.success);
        assert!(network.read().await.congested_routers().is_empty());

        let response = send(&network, "route", serde_json::Value::Null).await;
        assert!(!response.success);

        let response = send(&network, "reboot", serde_json::Value::Null).await;
        assert!(!response.success);
        assert_eq!(response.message, "Unknown command: reboot");
    }

    #[tokio::test]
    async fn status_and_topology() {
        let network = shared_square();

        let response = send(&network, "status", serde_json::Value::Null).await;
        let data = response.data.unwrap();
        assert_eq!(data["router_count"], 4);
        assert_eq!(data["link_count"], 4);

        let response = send(&network, "topology", serde_json::Value::Null).await;
        let data = response.data.unwrap();
        assert_eq!(data["addresses"][2], "10.0.0.3");
        assert_eq!(data["links"][0], json!({ "from": 0, "to": 1, "weight": 1 }));
        assert_eq!(data["congestion"], json!([0, 0, 0, 0]));
    }
}
