//! Docker engine implementation using bollard

use crate::format::{cpu_percent, format_size_stats, memory_percent};
use crate::types::{container_name, resolve_endpoint, Endpoint};
use crate::{
    Container, ContainerEngine, ContainerNetwork, ContainerStats, EngineError, EngineEvent,
    EventStream, HostInfo, Image, ImageBuildInfo, ImageLayer, MountInfo, Network, NetworkMember,
    PortMapping, ProcessList, Result, Volume,
};
use async_trait::async_trait;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogsOptions, RemoveContainerOptions,
    RestartContainerOptions, StartContainerOptions, StatsOptions, StopContainerOptions, TopOptions,
};
use bollard::image::{ListImagesOptions, RemoveImageOptions};
use bollard::models::{ContainerInspectResponse, ContainerSummary, HistoryResponseItem, ImageInspect};
use bollard::network::{InspectNetworkOptions, ListNetworksOptions};
use bollard::system::EventsOptions;
use bollard::volume::{ListVolumesOptions, RemoveVolumeOptions};
use bollard::Docker;
use futures::StreamExt;
use std::collections::HashMap;

/// Docker engine using bollard crate
pub struct DockerEngine {
    client: Docker,
}

impl DockerEngine {
    /// Connect to the engine.
    ///
    /// An empty socket uses the local defaults (honoring `DOCKER_HOST`);
    /// `unix://` or an absolute path selects a unix socket and `http(s)://`
    /// a TCP endpoint.
    pub async fn connect(socket: &str, timeout_secs: u64) -> Result<Self> {
        let client = if socket.is_empty() {
            Docker::connect_with_local_defaults()
                .map_err(|e| EngineError::ConnectionError(e.to_string()))?
        } else if socket.starts_with("http://") || socket.starts_with("https://") {
            Docker::connect_with_http(socket, timeout_secs, bollard::API_DEFAULT_VERSION)
                .map_err(|e| EngineError::ConnectionError(e.to_string()))?
        } else {
            let path = socket.trim_start_matches("unix://");
            Docker::connect_with_socket(path, timeout_secs, bollard::API_DEFAULT_VERSION)
                .map_err(|e| EngineError::ConnectionError(e.to_string()))?
        };

        client
            .ping()
            .await
            .map_err(|e| EngineError::ConnectionError(e.to_string()))?;

        tracing::debug!("Connected to container engine");
        Ok(Self { client })
    }

    async fn network_member(&self, id: &str, name: String, ip_address: String) -> NetworkMember {
        let mut member = NetworkMember {
            id: id.to_string(),
            name,
            ip_address,
            ..Default::default()
        };

        match self.client.inspect_container(id, None::<InspectContainerOptions>).await {
            Ok(info) => {
                member.image = info
                    .config
                    .and_then(|c| c.image)
                    .unwrap_or_default();
                member.state = info
                    .state
                    .and_then(|s| s.status)
                    .map(|s| s.to_string())
                    .unwrap_or_default();
            }
            Err(e) => tracing::warn!("Failed to inspect network member {}: {}", id, e),
        }

        member
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn list_containers(&self) -> Result<Vec<Container>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };

        let summaries = self.client.list_containers(Some(options)).await?;

        let mut containers = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let id = summary.id.clone().unwrap_or_default();
            let inspect = match self
                .client
                .inspect_container(&id, Some(InspectContainerOptions { size: true }))
                .await
            {
                Ok(inspect) => inspect,
                Err(e) => {
                    tracing::warn!("Skipping container {}: {}", id, e);
                    continue;
                }
            };
            containers.push(container_from_parts(summary, inspect));
        }

        tracing::debug!("Listed {} containers", containers.len());
        Ok(containers)
    }

    async fn stop_container(&self, id: &str, timeout: i64) -> Result<()> {
        self.client
            .stop_container(id, Some(StopContainerOptions { t: timeout }))
            .await?;
        Ok(())
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.client
            .start_container(id, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<()> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.client.remove_container(id, Some(options)).await?;
        Ok(())
    }

    async fn restart_container(&self, id: &str) -> Result<()> {
        self.client
            .restart_container(id, None::<RestartContainerOptions>)
            .await?;
        Ok(())
    }

    async fn pause_container(&self, id: &str) -> Result<()> {
        self.client.pause_container(id).await?;
        Ok(())
    }

    async fn unpause_container(&self, id: &str) -> Result<()> {
        self.client.unpause_container(id).await?;
        Ok(())
    }

    async fn container_logs(&self, id: &str, tail: usize) -> Result<Vec<String>> {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            timestamps: true,
            tail: tail.to_string(),
            ..Default::default()
        };

        let mut stream = self.client.logs(id, Some(options));
        let mut raw = String::new();
        while let Some(chunk) = stream.next().await {
            raw.push_str(&chunk?.to_string());
        }

        Ok(raw.lines().map(str::to_string).collect())
    }

    async fn container_stats(&self, id: &str) -> Result<ContainerStats> {
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };

        let mut stream = self.client.stats(id, Some(options));
        let stats = match stream.next().await {
            Some(stats) => stats?,
            None => {
                return Err(EngineError::RuntimeError(format!(
                    "No stats returned for container {}",
                    id
                )))
            }
        };

        let usage = stats.memory_stats.usage.unwrap_or(0) as f64;
        let limit = stats.memory_stats.limit.unwrap_or(0) as f64;

        Ok(ContainerStats {
            id: id.to_string(),
            cpu_percent: cpu_percent(
                stats.cpu_stats.cpu_usage.total_usage,
                stats.precpu_stats.cpu_usage.total_usage,
                stats.cpu_stats.system_cpu_usage.unwrap_or(0),
                stats.precpu_stats.system_cpu_usage.unwrap_or(0),
            ),
            mem_usage: format_size_stats(usage),
            mem_limit: format_size_stats(limit),
            mem_percent: memory_percent(usage, limit),
            pids: stats.pids_stats.current.unwrap_or(0),
        })
    }

    async fn container_top(&self, id: &str) -> Result<ProcessList> {
        let top = self
            .client
            .top_processes(id, None::<TopOptions<String>>)
            .await?;

        Ok(ProcessList {
            titles: top.titles.unwrap_or_default(),
            processes: top.processes.unwrap_or_default(),
        })
    }

    async fn list_images(&self) -> Result<Vec<Image>> {
        let options = ListImagesOptions::<String> {
            all: false,
            ..Default::default()
        };

        let summaries = self.client.list_images(Some(options)).await?;

        let mut images = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let inspect = match self.client.inspect_image(&summary.id).await {
                Ok(inspect) => inspect,
                Err(e) => {
                    tracing::warn!("Skipping image {}: {}", summary.id, e);
                    continue;
                }
            };
            let history = match self.client.image_history(&summary.id).await {
                Ok(history) => history,
                Err(e) => {
                    tracing::warn!("No history for image {}: {}", summary.id, e);
                    Vec::new()
                }
            };

            images.push(Image {
                id: strip_digest_prefix(&summary.id),
                repo_tags: summary.repo_tags,
                size: summary.size,
                created: summary.created,
                build: build_info(inspect),
                history: layers_newest_first(history),
            });
        }

        tracing::debug!("Listed {} images", images.len());
        Ok(images)
    }

    async fn remove_image(&self, id: &str, force: bool) -> Result<()> {
        let options = RemoveImageOptions {
            force,
            noprune: false,
        };
        self.client.remove_image(id, Some(options), None).await?;
        Ok(())
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        let listed = self
            .client
            .list_networks(None::<ListNetworksOptions<String>>)
            .await?;

        let mut networks = Vec::with_capacity(listed.len());
        for summary in listed {
            let id = summary.id.clone().unwrap_or_default();
            let network = match self
                .client
                .inspect_network(&id, None::<InspectNetworkOptions<String>>)
                .await
            {
                Ok(network) => network,
                Err(e) => {
                    tracing::warn!("Skipping network {}: {}", id, e);
                    continue;
                }
            };

            let (subnet, gateway) = network
                .ipam
                .as_ref()
                .and_then(|ipam| ipam.config.as_ref())
                .and_then(|config| config.first())
                .map(|c| {
                    (
                        c.subnet.clone().unwrap_or_default(),
                        c.gateway.clone().unwrap_or_default(),
                    )
                })
                .unwrap_or_default();

            let mut members = Vec::new();
            let mut attached: Vec<_> = network
                .containers
                .clone()
                .unwrap_or_default()
                .into_iter()
                .collect();
            attached.sort_by(|a, b| a.0.cmp(&b.0));
            for (container_id, endpoint) in attached {
                members.push(
                    self.network_member(
                        &container_id,
                        endpoint.name.unwrap_or_default(),
                        endpoint.ipv4_address.unwrap_or_default(),
                    )
                    .await,
                );
            }

            networks.push(Network {
                id,
                name: network.name.unwrap_or_default(),
                driver: network.driver.unwrap_or_default(),
                subnet,
                gateway,
                attachable: network.attachable.unwrap_or(false),
                created: network.created.map(|c| c.to_string()).unwrap_or_default(),
                labels: network.labels.unwrap_or_default(),
                containers: members,
            });
        }

        tracing::debug!("Listed {} networks", networks.len());
        Ok(networks)
    }

    async fn remove_network(&self, id: &str) -> Result<()> {
        self.client.remove_network(id).await?;
        Ok(())
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        let response = self
            .client
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await?;

        let volumes: Vec<Volume> = response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| Volume {
                name: v.name,
                driver: v.driver,
                mountpoint: v.mountpoint,
                created_at: v.created_at.map(|c| c.to_string()).unwrap_or_default(),
                labels: v.labels,
                containers: Vec::new(),
            })
            .collect();

        tracing::debug!("Listed {} volumes", volumes.len());
        Ok(volumes)
    }

    async fn remove_volume(&self, name: &str) -> Result<()> {
        self.client
            .remove_volume(name, Some(RemoveVolumeOptions { force: false }))
            .await?;
        Ok(())
    }

    async fn version(&self) -> Result<String> {
        let version = self.client.version().await?;
        Ok(version.version.unwrap_or_default())
    }

    async fn host_info(&self) -> Result<HostInfo> {
        let info = self.client.info().await?;
        Ok(HostInfo {
            cpus: info.ncpu.unwrap_or(0),
            memory_total: info.mem_total.unwrap_or(0),
        })
    }

    fn events(&self) -> EventStream {
        let stream = self
            .client
            .events(None::<EventsOptions<String>>)
            .map(|event| {
                let event = event?;
                Ok(EngineEvent {
                    kind: event.typ.map(|t| t.to_string()).unwrap_or_default(),
                    action: event.action.unwrap_or_default(),
                    actor_id: event.actor.and_then(|a| a.id).unwrap_or_default(),
                })
            });
        Box::pin(stream)
    }
}

/// Merge a list entry with its inspect response
fn container_from_parts(summary: ContainerSummary, inspect: ContainerInspectResponse) -> Container {
    let config = inspect.config.unwrap_or_default();
    let mode = inspect
        .host_config
        .and_then(|h| h.network_mode)
        .unwrap_or_default();

    let settings = inspect.network_settings.unwrap_or_default();
    let default = Endpoint {
        ip_address: settings.ip_address.unwrap_or_default(),
        gateway: settings.gateway.unwrap_or_default(),
    };
    let networks: HashMap<String, Endpoint> = settings
        .networks
        .unwrap_or_default()
        .into_iter()
        .map(|(name, net)| {
            (
                name,
                Endpoint {
                    ip_address: net.ip_address.unwrap_or_default(),
                    gateway: net.gateway.unwrap_or_default(),
                },
            )
        })
        .collect();
    let endpoint = resolve_endpoint(&mode, &default, &networks);

    let mounts: Vec<MountInfo> = inspect
        .mounts
        .unwrap_or_default()
        .into_iter()
        .map(|m| MountInfo {
            kind: m.typ.map(|t| t.to_string()).unwrap_or_default(),
            name: m.name.unwrap_or_default(),
            source: m.source.unwrap_or_default(),
            destination: m.destination.unwrap_or_default(),
            read_write: m.rw.unwrap_or(false),
        })
        .collect();

    let ports = summary
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|p| PortMapping {
            ip: p.ip.unwrap_or_default(),
            private_port: p.private_port,
            public_port: p.public_port,
            protocol: p.typ.map(|t| t.to_string()).unwrap_or_default(),
        })
        .collect();

    let entrypoint = config.entrypoint.unwrap_or_default().join(" ");
    let cmd = config.cmd.unwrap_or_default().join(" ");

    Container {
        id: summary.id.unwrap_or_default(),
        name: container_name(&summary.names.unwrap_or_default()),
        image: summary.image.unwrap_or_default(),
        state: summary.state.unwrap_or_default(),
        status: summary.status.unwrap_or_default(),
        ports,
        size_root_fs: inspect.size_root_fs.unwrap_or(0),
        command: format!("{} {}", entrypoint, cmd),
        env: config.env.unwrap_or_default(),
        read_only: mounts.first().map(|m| !m.read_write).unwrap_or(false),
        mounted_at: mounts
            .first()
            .map(|m| m.destination.clone())
            .unwrap_or_default(),
        network: ContainerNetwork {
            name: mode,
            ip_address: endpoint.ip_address,
            gateway: endpoint.gateway,
        },
        mounts,
    }
}

fn build_info(inspect: ImageInspect) -> ImageBuildInfo {
    let config = inspect.config.unwrap_or_default();
    let mut exposed_ports: Vec<String> = config
        .exposed_ports
        .unwrap_or_default()
        .into_keys()
        .collect();
    exposed_ports.sort();

    ImageBuildInfo {
        os: inspect.os.unwrap_or_default(),
        architecture: inspect.architecture.unwrap_or_default(),
        docker_version: inspect.docker_version.unwrap_or_default(),
        author: inspect.author.unwrap_or_default(),
        entrypoint: config.entrypoint.unwrap_or_default(),
        cmd: config.cmd.unwrap_or_default(),
        exposed_ports,
        env: config.env.unwrap_or_default(),
    }
}

/// History arrives oldest layer first; reverse it for display
fn layers_newest_first(history: Vec<HistoryResponseItem>) -> Vec<ImageLayer> {
    history
        .into_iter()
        .rev()
        .map(|h| ImageLayer {
            id: h.id,
            created: h.created,
            created_by: h.created_by,
            tags: h.tags,
            size: h.size,
            comment: h.comment,
        })
        .collect()
}

fn strip_digest_prefix(id: &str) -> String {
    id.strip_prefix("sha256:").unwrap_or(id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{
        ContainerConfig, EndpointSettings, HostConfig, MountPoint, NetworkSettings, Port,
    };

    fn summary() -> ContainerSummary {
        ContainerSummary {
            id: Some("1234567890abcdef".into()),
            names: Some(vec!["/web".into()]),
            image: Some("nginx:latest".into()),
            state: Some("running".into()),
            status: Some("Up 3 hours".into()),
            ports: Some(vec![Port {
                ip: Some("0.0.0.0".into()),
                private_port: 80,
                public_port: Some(8080),
                typ: None,
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_container_from_parts_custom_network() {
        let mut networks = HashMap::new();
        networks.insert(
            "custom-net".to_string(),
            EndpointSettings {
                ip_address: Some("172.20.0.5".into()),
                gateway: Some("172.20.0.1".into()),
                ..Default::default()
            },
        );
        let inspect = ContainerInspectResponse {
            size_root_fs: Some(2048),
            config: Some(ContainerConfig {
                entrypoint: Some(vec!["/docker-entrypoint.sh".into()]),
                cmd: Some(vec!["nginx".into(), "-g".into(), "daemon off;".into()]),
                env: Some(vec!["PATH=/usr/bin".into()]),
                ..Default::default()
            }),
            host_config: Some(HostConfig {
                network_mode: Some("custom-net".into()),
                ..Default::default()
            }),
            network_settings: Some(NetworkSettings {
                ip_address: Some("172.17.0.2".into()),
                gateway: Some("172.17.0.1".into()),
                networks: Some(networks),
                ..Default::default()
            }),
            mounts: Some(vec![MountPoint {
                destination: Some("/usr/share/nginx/html".into()),
                rw: Some(false),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let container = container_from_parts(summary(), inspect);

        assert_eq!(container.name, "web");
        assert_eq!(container.size_root_fs, 2048);
        assert_eq!(container.command, "/docker-entrypoint.sh nginx -g daemon off;");
        assert_eq!(container.network.name, "custom-net");
        assert_eq!(container.network.ip_address, "172.20.0.5");
        assert_eq!(container.network.gateway, "172.20.0.1");
        assert!(container.read_only);
        assert_eq!(container.mounted_at, "/usr/share/nginx/html");
        assert_eq!(container.ports[0].public_port, Some(8080));
    }

    #[test]
    fn test_container_from_parts_without_inspect_data() {
        let container = container_from_parts(summary(), ContainerInspectResponse::default());
        assert_eq!(container.network.ip_address, "");
        assert!(!container.read_only);
        assert_eq!(container.mounted_at, "");
        assert_eq!(container.command, " ");
    }

    #[test]
    fn test_layers_newest_first() {
        let history = vec![
            HistoryResponseItem {
                id: "oldest".into(),
                ..Default::default()
            },
            HistoryResponseItem {
                id: "newest".into(),
                ..Default::default()
            },
        ];
        let layers = layers_newest_first(history);
        assert_eq!(layers[0].id, "newest");
        assert_eq!(layers[1].id, "oldest");
    }

    #[test]
    fn test_strip_digest_prefix() {
        assert_eq!(strip_digest_prefix("sha256:abc123"), "abc123");
        assert_eq!(strip_digest_prefix("abc123"), "abc123");
    }
}
