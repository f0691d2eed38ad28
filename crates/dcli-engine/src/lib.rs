//! Container engine trait and implementations for dcli
//!
//! This crate provides an abstraction over the local container engine with
//! the list, inspect, lifecycle, logs, stats and event operations the
//! dashboard needs, plus the display formatting shared by every screen.

mod docker;
mod error;
pub mod format;
mod types;

pub use docker::DockerEngine;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of engine events, ending when the engine closes the subscription
pub type EventStream = Pin<Box<dyn Stream<Item = Result<EngineEvent>> + Send>>;

/// Grace period given to a container before it is killed on stop
pub const STOP_TIMEOUT_SECS: i64 = 10;

/// Number of log lines fetched for the logs screen
pub const LOG_TAIL_LINES: usize = 800;

/// Trait for container engines (Docker and API-compatible daemons)
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// List all containers, including stopped ones, with their inspect data
    async fn list_containers(&self) -> Result<Vec<Container>>;

    /// Stop a container, waiting at most `timeout` seconds before killing it
    async fn stop_container(&self, id: &str, timeout: i64) -> Result<()>;

    async fn start_container(&self, id: &str) -> Result<()>;

    async fn remove_container(&self, id: &str, force: bool) -> Result<()>;

    async fn restart_container(&self, id: &str) -> Result<()>;

    async fn pause_container(&self, id: &str) -> Result<()>;

    async fn unpause_container(&self, id: &str) -> Result<()>;

    /// Last `tail` log lines of a container, with timestamps, oldest first
    async fn container_logs(&self, id: &str, tail: usize) -> Result<Vec<String>>;

    /// Single-shot resource usage
    async fn container_stats(&self, id: &str) -> Result<ContainerStats>;

    /// Processes running inside a container
    async fn container_top(&self, id: &str) -> Result<ProcessList>;

    /// List images with their inspect data and layer history
    async fn list_images(&self) -> Result<Vec<Image>>;

    /// Remove an image, pruning dangling parents
    async fn remove_image(&self, id: &str, force: bool) -> Result<()>;

    /// List networks with their member containers
    async fn list_networks(&self) -> Result<Vec<Network>>;

    async fn remove_network(&self, id: &str) -> Result<()>;

    async fn list_volumes(&self) -> Result<Vec<Volume>>;

    async fn remove_volume(&self, name: &str) -> Result<()>;

    /// Engine server version
    async fn version(&self) -> Result<String>;

    /// Host resources as seen by the engine
    async fn host_info(&self) -> Result<HostInfo>;

    /// Subscribe to the engine event stream
    fn events(&self) -> EventStream;
}

/// Connect to the engine named by the global config
pub async fn create_engine(config: &dcli_config::GlobalConfig) -> Result<DockerEngine> {
    let socket = config.engine.socket.as_str();
    match DockerEngine::connect(socket, config.engine.timeout_secs).await {
        Ok(engine) => Ok(engine),
        Err(e) => {
            let socket_exists = !socket.is_empty()
                && !socket.starts_with("http")
                && std::path::Path::new(socket.trim_start_matches("unix://")).exists();
            Err(EngineError::ConnectionError(format_connection_error(
                socket,
                socket_exists,
                &e,
            )))
        }
    }
}

/// Format a helpful connection error message with actionable instructions
fn format_connection_error(socket: &str, socket_exists: bool, underlying: &EngineError) -> String {
    let mut msg = String::from("Cannot connect to the container engine\n\n");

    if socket.is_empty() {
        msg.push_str("No socket configured, tried the local defaults (DOCKER_HOST or /var/run/docker.sock).\n\n");
        msg.push_str("To start Docker, run:\n");
        msg.push_str("  sudo systemctl enable --now docker\n\n");
        msg.push_str(&format!("Underlying error: {}\n", underlying));
    } else if socket.starts_with("http") {
        msg.push_str(&format!("The engine at {} is not responding.\n\n", socket));
        msg.push_str(&format!("Underlying error: {}\n", underlying));
    } else if !socket_exists {
        msg.push_str(&format!(
            "The engine API socket was not found at:\n  {}\n\n",
            socket
        ));
        msg.push_str("To start Docker, run:\n");
        msg.push_str("  sudo systemctl enable --now docker\n");
    } else {
        msg.push_str(&format!(
            "The socket exists at {} but the daemon is not responding.\n\n",
            socket
        ));
        msg.push_str(&format!("Underlying error: {}\n", underlying));
    }

    msg
}
