//! Entity snapshot store
//!
//! Holds the last successful fetch of every entity kind. Each refresh
//! replaces one list wholesale; a failed refresh leaves the previous list
//! in place and returns the error to the caller.

use crate::Result;
use dcli_engine::{Container, ContainerEngine, Image, Network, Stack, Volume, VolumeUser};
use std::sync::Arc;
use tokio::sync::RwLock;

/// One generation of fetched entities
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub containers: Vec<Container>,
    pub images: Vec<Image>,
    pub networks: Vec<Network>,
    pub volumes: Vec<Volume>,
    pub stacks: Vec<Stack>,
}

/// Shared cache of engine entities
///
/// Cloning is cheap and every clone sees the same snapshot, so the UI and
/// the background listener can refresh through the same store.
#[derive(Clone)]
pub struct SnapshotStore {
    engine: Arc<dyn ContainerEngine>,
    snapshot: Arc<RwLock<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(engine: Arc<dyn ContainerEngine>) -> Self {
        Self {
            engine,
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
        }
    }

    /// The engine this store fetches from
    pub fn engine(&self) -> Arc<dyn ContainerEngine> {
        Arc::clone(&self.engine)
    }

    /// Copy of the current snapshot
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Refetch containers; returns how many were listed
    pub async fn refresh_containers(&self) -> Result<usize> {
        let containers = self.engine.list_containers().await?;
        let count = containers.len();
        self.snapshot.write().await.containers = containers;
        tracing::debug!("Container snapshot replaced ({} containers)", count);
        Ok(count)
    }

    pub async fn refresh_images(&self) -> Result<usize> {
        let images = self.engine.list_images().await?;
        let count = images.len();
        self.snapshot.write().await.images = images;
        tracing::debug!("Image snapshot replaced ({} images)", count);
        Ok(count)
    }

    pub async fn refresh_networks(&self) -> Result<usize> {
        let networks = self.engine.list_networks().await?;
        let count = networks.len();
        self.snapshot.write().await.networks = networks;
        tracing::debug!("Network snapshot replaced ({} networks)", count);
        Ok(count)
    }

    /// Refetch volumes, attaching the containers from the current container
    /// snapshot that mount each one
    pub async fn refresh_volumes(&self) -> Result<usize> {
        let mut volumes = self.engine.list_volumes().await?;
        let count = volumes.len();

        let mut snapshot = self.snapshot.write().await;
        for volume in &mut volumes {
            volume.containers = volume_users(&snapshot.containers, &volume.name);
        }
        snapshot.volumes = volumes;
        tracing::debug!("Volume snapshot replaced ({} volumes)", count);
        Ok(count)
    }

    /// Force a network refresh and derive the stacks from the networks
    /// carrying the compose project label
    pub async fn refresh_stacks(&self) -> Result<usize> {
        self.refresh_networks().await?;

        let mut snapshot = self.snapshot.write().await;
        let stacks: Vec<Stack> = snapshot
            .networks
            .iter()
            .filter(|n| n.compose_project().is_some())
            .cloned()
            .map(|network| Stack { network })
            .collect();
        let count = stacks.len();
        snapshot.stacks = stacks;
        tracing::debug!("Stack snapshot replaced ({} stacks)", count);
        Ok(count)
    }

    pub async fn containers(&self) -> Vec<Container> {
        self.snapshot.read().await.containers.clone()
    }

    pub async fn images(&self) -> Vec<Image> {
        self.snapshot.read().await.images.clone()
    }

    pub async fn networks(&self) -> Vec<Network> {
        self.snapshot.read().await.networks.clone()
    }

    pub async fn volumes(&self) -> Vec<Volume> {
        self.snapshot.read().await.volumes.clone()
    }

    pub async fn stacks(&self) -> Vec<Stack> {
        self.snapshot.read().await.stacks.clone()
    }

    /// Container by full id
    pub async fn container(&self, id: &str) -> Option<Container> {
        let snapshot = self.snapshot.read().await;
        snapshot.containers.iter().find(|c| c.id == id).cloned()
    }

    /// Image by full id (without the digest prefix)
    pub async fn image(&self, id: &str) -> Option<Image> {
        let snapshot = self.snapshot.read().await;
        snapshot.images.iter().find(|i| i.id == id).cloned()
    }

    /// Network by full id
    pub async fn network(&self, id: &str) -> Option<Network> {
        let snapshot = self.snapshot.read().await;
        snapshot.networks.iter().find(|n| n.id == id).cloned()
    }

    /// Volume by name
    pub async fn volume(&self, name: &str) -> Option<Volume> {
        let snapshot = self.snapshot.read().await;
        snapshot.volumes.iter().find(|v| v.name == name).cloned()
    }

    /// Stack by network name
    pub async fn stack(&self, name: &str) -> Option<Stack> {
        let snapshot = self.snapshot.read().await;
        snapshot.stacks.iter().find(|s| s.name() == name).cloned()
    }
}

/// Containers mounting the named volume, one entry per matching mount
fn volume_users(containers: &[Container], volume: &str) -> Vec<VolumeUser> {
    containers
        .iter()
        .flat_map(|c| {
            c.mounts
                .iter()
                .filter(move |m| m.kind == "volume" && m.name == volume)
                .map(move |m| VolumeUser {
                    name: c.name.clone(),
                    mounted_at: m.destination.clone(),
                    read_only: !m.read_write,
                })
        })
        .collect()
}
