//! Entity types returned by the container engine

use crate::format::{format_size, format_timestamp, trim_value};
use std::collections::HashMap;

/// Label the compose tooling puts on every resource of a project
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// A published port of a container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortMapping {
    pub ip: String,
    pub private_port: u16,
    pub public_port: Option<u16>,
    /// tcp / udp / sctp
    pub protocol: String,
}

/// A mount attached to a container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountInfo {
    /// bind / volume / tmpfs / npipe
    pub kind: String,
    /// Volume name (empty for bind mounts)
    pub name: String,
    pub source: String,
    pub destination: String,
    pub read_write: bool,
}

/// Network placement of a container, resolved through its network mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerNetwork {
    /// Network mode the container runs under ("default", "bridge", a network name...)
    pub name: String,
    pub ip_address: String,
    pub gateway: String,
}

/// Address of a container on one network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    pub ip_address: String,
    pub gateway: String,
}

/// Resolve a container's address through its network mode.
///
/// Mode "default" reads the top-level settings; any other mode is looked
/// up by name in the per-network map and never falls back.
pub fn resolve_endpoint(
    mode: &str,
    default: &Endpoint,
    networks: &HashMap<String, Endpoint>,
) -> Endpoint {
    if mode == "default" {
        return default.clone();
    }
    networks.get(mode).cloned().unwrap_or_default()
}

/// Container name without the leading slash the engine reports
pub fn container_name(names: &[String]) -> String {
    names
        .first()
        .map(|n| n.strip_prefix('/').unwrap_or(n).to_string())
        .unwrap_or_default()
}

/// A container as listed by the engine, enriched with its inspect data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Raw lifecycle state string as reported by the engine
    pub state: String,
    /// Human status ("Up 3 hours", "Exited (0) 2 days ago")
    pub status: String,
    pub ports: Vec<PortMapping>,
    /// Root filesystem size in bytes
    pub size_root_fs: i64,
    /// Entrypoint and command joined with spaces
    pub command: String,
    pub env: Vec<String>,
    /// True when the first mount is not writable
    pub read_only: bool,
    /// Destination of the first mount
    pub mounted_at: String,
    pub network: ContainerNetwork,
    pub mounts: Vec<MountInfo>,
}

impl Container {
    pub fn size(&self) -> String {
        format_size(self.size_root_fs)
    }
}

/// Build metadata recorded in an image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageBuildInfo {
    pub os: String,
    pub architecture: String,
    pub docker_version: String,
    pub author: String,
    pub entrypoint: Vec<String>,
    pub cmd: Vec<String>,
    pub exposed_ports: Vec<String>,
    pub env: Vec<String>,
}

/// One layer of an image history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageLayer {
    pub id: String,
    pub created: i64,
    pub created_by: String,
    pub tags: Vec<String>,
    pub size: i64,
    pub comment: String,
}

/// An image with its inspect data and layer history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    /// Full id without the `sha256:` prefix
    pub id: String,
    pub repo_tags: Vec<String>,
    pub size: i64,
    /// Creation time, seconds since the epoch
    pub created: i64,
    pub build: ImageBuildInfo,
    /// Layers, newest first
    pub history: Vec<ImageLayer>,
}

impl Image {
    pub fn short_id(&self) -> String {
        trim_value(&self.id, 10)
    }

    /// First repository tag, or `<none>` for dangling images
    pub fn repo_tag(&self) -> String {
        self.repo_tags
            .first()
            .map(|t| trim_value(t, 40))
            .unwrap_or_else(|| "<none>".to_string())
    }

    /// Formatted size, empty when unknown
    pub fn formatted_size(&self) -> String {
        if self.size == 0 {
            return String::new();
        }
        format_size(self.size)
    }

    /// Relative creation time computed against `now`, empty when unknown
    pub fn formatted_created(&self, now: i64) -> String {
        if self.created == 0 {
            return String::new();
        }
        format_timestamp(self.created, now)
    }
}

/// A container attached to a network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkMember {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub ip_address: String,
}

/// A network and its member containers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub subnet: String,
    pub gateway: String,
    pub attachable: bool,
    /// Creation timestamp as reported by the engine (RFC 3339)
    pub created: String,
    pub labels: HashMap<String, String>,
    pub containers: Vec<NetworkMember>,
}

impl Network {
    /// Compose project this network belongs to, if any
    pub fn compose_project(&self) -> Option<&str> {
        self.labels.get(COMPOSE_PROJECT_LABEL).map(|s| s.as_str())
    }
}

/// A container mounting a volume
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeUser {
    pub name: String,
    pub mounted_at: String,
    pub read_only: bool,
}

/// A named volume
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Volume {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub created_at: String,
    pub labels: HashMap<String, String>,
    /// Containers currently mounting the volume (filled from the container snapshot)
    pub containers: Vec<VolumeUser>,
}

/// A compose project, identified through its network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    pub network: Network,
}

impl Stack {
    pub fn name(&self) -> &str {
        &self.network.name
    }

    pub fn containers(&self) -> &[NetworkMember] {
        &self.network.containers
    }
}

/// Single-shot resource usage of a container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerStats {
    pub id: String,
    pub cpu_percent: f64,
    pub mem_usage: String,
    pub mem_limit: String,
    pub mem_percent: f64,
    pub pids: u64,
}

/// Processes running inside a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessList {
    pub titles: Vec<String>,
    pub processes: Vec<Vec<String>>,
}

/// Host resources as reported by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub cpus: i64,
    pub memory_total: i64,
}

/// An event from the engine event stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineEvent {
    /// container / image / network / volume ...
    pub kind: String,
    pub action: String,
    pub actor_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_endpoint_default_mode() {
        let default = Endpoint::default();
        let mut networks = HashMap::new();
        networks.insert(
            "default".to_string(),
            Endpoint {
                ip_address: "10.0.0.9".into(),
                gateway: "10.0.0.1".into(),
            },
        );
        let resolved = resolve_endpoint("default", &default, &networks);
        assert_eq!(resolved.ip_address, "");
        assert_eq!(resolved.gateway, "");
    }

    #[test]
    fn test_resolve_endpoint_named_network() {
        let default = Endpoint {
            ip_address: "172.17.0.2".into(),
            gateway: "172.17.0.1".into(),
        };
        let mut networks = HashMap::new();
        networks.insert(
            "custom-net".to_string(),
            Endpoint {
                ip_address: "172.20.0.5".into(),
                gateway: "172.20.0.1".into(),
            },
        );
        let resolved = resolve_endpoint("custom-net", &default, &networks);
        assert_eq!(resolved.ip_address, "172.20.0.5");
        assert_eq!(resolved.gateway, "172.20.0.1");
    }

    #[test]
    fn test_resolve_endpoint_missing_network_is_empty() {
        let default = Endpoint {
            ip_address: "172.17.0.2".into(),
            gateway: "172.17.0.1".into(),
        };
        let resolved = resolve_endpoint("host", &default, &HashMap::new());
        assert_eq!(resolved, Endpoint::default());
    }

    #[test]
    fn test_container_name() {
        assert_eq!(container_name(&["/container_name".to_string()]), "container_name");
        assert_eq!(container_name(&[]), "");
    }

    #[test]
    fn test_image_repo_tag_none() {
        let image = Image::default();
        assert_eq!(image.repo_tag(), "<none>");
    }

    #[test]
    fn test_image_repo_tag_truncated() {
        let image = Image {
            repo_tags: vec!["registry.example.com/team/very-long-image-name:with-a-tag".into()],
            ..Default::default()
        };
        assert_eq!(image.repo_tag().chars().count(), 40);
    }

    #[test]
    fn test_image_empty_size_and_created() {
        let image = Image::default();
        assert_eq!(image.formatted_size(), "");
        assert_eq!(image.formatted_created(1_700_000_000), "");
    }

    #[test]
    fn test_network_compose_project() {
        let mut network = Network::default();
        assert!(network.compose_project().is_none());
        network
            .labels
            .insert(COMPOSE_PROJECT_LABEL.to_string(), "shop".to_string());
        assert_eq!(network.compose_project(), Some("shop"));
    }
}
