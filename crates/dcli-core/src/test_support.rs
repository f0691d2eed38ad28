//! Test support utilities for dcli-core
//!
//! Provides MockEngine and entity fixtures for unit testing the store,
//! the dispatcher and the UI without a running container engine.

use async_trait::async_trait;
use dcli_engine::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    ListContainers,
    StopContainer { id: String, timeout: i64 },
    StartContainer { id: String },
    RemoveContainer { id: String, force: bool },
    RestartContainer { id: String },
    PauseContainer { id: String },
    UnpauseContainer { id: String },
    ContainerLogs { id: String, tail: usize },
    ContainerStats { id: String },
    ContainerTop { id: String },
    ListImages,
    RemoveImage { id: String, force: bool },
    ListNetworks,
    RemoveNetwork { id: String },
    ListVolumes,
    RemoveVolume { name: String },
    Version,
    HostInfo,
    Events,
}

/// Configurable mock container engine for testing
pub struct MockEngine {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Result for list_containers calls
    pub containers_result: Arc<Mutex<Result<Vec<Container>>>>,
    /// Result for stop_container calls
    pub stop_result: Arc<Mutex<Result<()>>>,
    /// Result for start_container calls
    pub start_result: Arc<Mutex<Result<()>>>,
    /// Result for remove_container calls
    pub remove_result: Arc<Mutex<Result<()>>>,
    /// Result for restart_container calls
    pub restart_result: Arc<Mutex<Result<()>>>,
    /// Result for pause_container calls
    pub pause_result: Arc<Mutex<Result<()>>>,
    /// Result for unpause_container calls
    pub unpause_result: Arc<Mutex<Result<()>>>,
    /// Result for container_logs calls (oldest line first)
    pub logs_result: Arc<Mutex<Result<Vec<String>>>>,
    /// Result for container_stats calls
    pub stats_result: Arc<Mutex<Result<ContainerStats>>>,
    /// Result for container_top calls
    pub top_result: Arc<Mutex<Result<ProcessList>>>,
    /// Result for list_images calls
    pub images_result: Arc<Mutex<Result<Vec<Image>>>>,
    /// Result for remove_image calls
    pub remove_image_result: Arc<Mutex<Result<()>>>,
    /// Result for list_networks calls
    pub networks_result: Arc<Mutex<Result<Vec<Network>>>>,
    /// Result for remove_network calls
    pub remove_network_result: Arc<Mutex<Result<()>>>,
    /// Result for list_volumes calls
    pub volumes_result: Arc<Mutex<Result<Vec<Volume>>>>,
    /// Result for remove_volume calls
    pub remove_volume_result: Arc<Mutex<Result<()>>>,
    /// Result for version calls
    pub version_result: Arc<Mutex<Result<String>>>,
    /// Result for host_info calls
    pub host_info_result: Arc<Mutex<Result<HostInfo>>>,
    /// Items yielded by the next events() subscription, then the stream ends
    pub scripted_events: Arc<Mutex<Vec<Result<EngineEvent>>>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Create a new mock engine with empty lists and successful actions
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            containers_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            stop_result: Arc::new(Mutex::new(Ok(()))),
            start_result: Arc::new(Mutex::new(Ok(()))),
            remove_result: Arc::new(Mutex::new(Ok(()))),
            restart_result: Arc::new(Mutex::new(Ok(()))),
            pause_result: Arc::new(Mutex::new(Ok(()))),
            unpause_result: Arc::new(Mutex::new(Ok(()))),
            logs_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            stats_result: Arc::new(Mutex::new(Ok(ContainerStats::default()))),
            top_result: Arc::new(Mutex::new(Ok(ProcessList::default()))),
            images_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            remove_image_result: Arc::new(Mutex::new(Ok(()))),
            networks_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            remove_network_result: Arc::new(Mutex::new(Ok(()))),
            volumes_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            remove_volume_result: Arc::new(Mutex::new(Ok(()))),
            version_result: Arc::new(Mutex::new(Ok("24.0.7".to_string()))),
            host_info_result: Arc::new(Mutex::new(Ok(HostInfo {
                cpus: 8,
                memory_total: 16 * 1024 * 1024 * 1024,
            }))),
            scripted_events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the containers returned by list_containers
    pub fn with_containers(self, containers: Vec<Container>) -> Self {
        *self.containers_result.lock().unwrap() = Ok(containers);
        self
    }

    /// Set the images returned by list_images
    pub fn with_images(self, images: Vec<Image>) -> Self {
        *self.images_result.lock().unwrap() = Ok(images);
        self
    }

    /// Set the networks returned by list_networks
    pub fn with_networks(self, networks: Vec<Network>) -> Self {
        *self.networks_result.lock().unwrap() = Ok(networks);
        self
    }

    /// Set the volumes returned by list_volumes
    pub fn with_volumes(self, volumes: Vec<Volume>) -> Self {
        *self.volumes_result.lock().unwrap() = Ok(volumes);
        self
    }

    /// Queue events for the next subscription
    pub fn with_events(self, events: Vec<Result<EngineEvent>>) -> Self {
        *self.scripted_events.lock().unwrap() = events;
        self
    }

    /// Record a call
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    /// Number of times a specific call was made
    pub fn call_count(&self, call: &MockCall) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| *c == call)
            .count()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

/// Helper to clone a Result<T> from an Arc<Mutex<Result<T>>>
fn clone_result<T: Clone>(r: &Arc<Mutex<Result<T>>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_engine_error(e)),
    }
}

/// Clone an EngineError (thiserror types don't implement Clone)
pub fn clone_engine_error(e: &EngineError) -> EngineError {
    match e {
        EngineError::ConnectionError(s) => EngineError::ConnectionError(s.clone()),
        EngineError::ContainerNotFound(s) => EngineError::ContainerNotFound(s.clone()),
        EngineError::ImageNotFound(s) => EngineError::ImageNotFound(s.clone()),
        EngineError::Api(e) => EngineError::RuntimeError(e.to_string()),
        EngineError::RuntimeError(s) => EngineError::RuntimeError(s.clone()),
        EngineError::IoError(e) => EngineError::RuntimeError(e.to_string()),
    }
}

#[async_trait]
impl ContainerEngine for MockEngine {
    async fn list_containers(&self) -> Result<Vec<Container>> {
        self.record(MockCall::ListContainers);
        clone_result(&self.containers_result)
    }

    async fn stop_container(&self, id: &str, timeout: i64) -> Result<()> {
        self.record(MockCall::StopContainer {
            id: id.to_string(),
            timeout,
        });
        clone_result(&self.stop_result)
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.record(MockCall::StartContainer { id: id.to_string() });
        clone_result(&self.start_result)
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<()> {
        self.record(MockCall::RemoveContainer {
            id: id.to_string(),
            force,
        });
        clone_result(&self.remove_result)
    }

    async fn restart_container(&self, id: &str) -> Result<()> {
        self.record(MockCall::RestartContainer { id: id.to_string() });
        clone_result(&self.restart_result)
    }

    async fn pause_container(&self, id: &str) -> Result<()> {
        self.record(MockCall::PauseContainer { id: id.to_string() });
        clone_result(&self.pause_result)
    }

    async fn unpause_container(&self, id: &str) -> Result<()> {
        self.record(MockCall::UnpauseContainer { id: id.to_string() });
        clone_result(&self.unpause_result)
    }

    async fn container_logs(&self, id: &str, tail: usize) -> Result<Vec<String>> {
        self.record(MockCall::ContainerLogs {
            id: id.to_string(),
            tail,
        });
        clone_result(&self.logs_result)
    }

    async fn container_stats(&self, id: &str) -> Result<ContainerStats> {
        self.record(MockCall::ContainerStats { id: id.to_string() });
        clone_result(&self.stats_result)
    }

    async fn container_top(&self, id: &str) -> Result<ProcessList> {
        self.record(MockCall::ContainerTop { id: id.to_string() });
        clone_result(&self.top_result)
    }

    async fn list_images(&self) -> Result<Vec<Image>> {
        self.record(MockCall::ListImages);
        clone_result(&self.images_result)
    }

    async fn remove_image(&self, id: &str, force: bool) -> Result<()> {
        self.record(MockCall::RemoveImage {
            id: id.to_string(),
            force,
        });
        clone_result(&self.remove_image_result)
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        self.record(MockCall::ListNetworks);
        clone_result(&self.networks_result)
    }

    async fn remove_network(&self, id: &str) -> Result<()> {
        self.record(MockCall::RemoveNetwork { id: id.to_string() });
        clone_result(&self.remove_network_result)
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        self.record(MockCall::ListVolumes);
        clone_result(&self.volumes_result)
    }

    async fn remove_volume(&self, name: &str) -> Result<()> {
        self.record(MockCall::RemoveVolume {
            name: name.to_string(),
        });
        clone_result(&self.remove_volume_result)
    }

    async fn version(&self) -> Result<String> {
        self.record(MockCall::Version);
        clone_result(&self.version_result)
    }

    async fn host_info(&self) -> Result<HostInfo> {
        self.record(MockCall::HostInfo);
        clone_result(&self.host_info_result)
    }

    fn events(&self) -> EventStream {
        self.record(MockCall::Events);
        let events = std::mem::take(&mut *self.scripted_events.lock().unwrap());
        Box::pin(futures::stream::iter(events))
    }
}

/// Create a mock container
pub fn mock_container(id: &str, name: &str, image: &str, state: &str) -> Container {
    Container {
        id: id.to_string(),
        name: name.to_string(),
        image: image.to_string(),
        state: state.to_string(),
        status: if state == "running" {
            "Up 2 hours".to_string()
        } else {
            "Exited (0) 3 days ago".to_string()
        },
        command: "/entrypoint.sh start".to_string(),
        network: ContainerNetwork {
            name: "bridge".to_string(),
            ip_address: "172.17.0.2".to_string(),
            gateway: "172.17.0.1".to_string(),
        },
        ..Default::default()
    }
}

/// Create a mock image with a single tag
pub fn mock_image(id: &str, tag: &str) -> Image {
    Image {
        id: id.to_string(),
        repo_tags: vec![tag.to_string()],
        size: 187 * 1024 * 1024,
        created: 1_700_000_000,
        build: ImageBuildInfo {
            os: "linux".to_string(),
            architecture: "amd64".to_string(),
            docker_version: "20.10.23".to_string(),
            cmd: vec!["nginx".to_string(), "-g".to_string(), "daemon off;".to_string()],
            exposed_ports: vec!["80/tcp".to_string()],
            ..Default::default()
        },
        history: Vec::new(),
    }
}

/// Create a mock network without labels
pub fn mock_network(id: &str, name: &str) -> Network {
    Network {
        id: id.to_string(),
        name: name.to_string(),
        driver: "bridge".to_string(),
        subnet: "172.18.0.0/16".to_string(),
        gateway: "172.18.0.1".to_string(),
        created: "2024-03-01T10:20:30.123456789Z".to_string(),
        ..Default::default()
    }
}

/// Create a mock network owned by a compose project
pub fn mock_stack_network(id: &str, name: &str, project: &str) -> Network {
    let mut network = mock_network(id, name);
    network.labels = HashMap::from([(COMPOSE_PROJECT_LABEL.to_string(), project.to_string())]);
    network
}

/// Create a mock volume
pub fn mock_volume(name: &str) -> Volume {
    Volume {
        name: name.to_string(),
        driver: "local".to_string(),
        mountpoint: format!("/var/lib/docker/volumes/{}/_data", name),
        created_at: "2024-03-01T10:20:30Z".to_string(),
        ..Default::default()
    }
}

/// Attach a named volume mount to a container
pub fn with_volume_mount(mut container: Container, volume: &str, destination: &str) -> Container {
    container.mounts.push(MountInfo {
        kind: "volume".to_string(),
        name: volume.to_string(),
        source: format!("/var/lib/docker/volumes/{}/_data", volume),
        destination: destination.to_string(),
        read_write: true,
    });
    container
}
