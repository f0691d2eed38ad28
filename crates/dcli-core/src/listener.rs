//! Background refresh listener
//!
//! Subscribes to the engine event stream and refetches the container
//! snapshot once per event. There is no coalescing: a burst of events
//! causes one refresh each.

use crate::SnapshotStore;
use futures::StreamExt;
use tokio::task::JoinHandle;

/// Spawn the listener task.
///
/// `on_refresh` runs after every successful refresh with the new container
/// count. The task ends when the engine closes the stream; abort the handle
/// to stop it earlier.
pub fn spawn_refresh_listener<F>(store: SnapshotStore, on_refresh: F) -> JoinHandle<()>
where
    F: Fn(usize) + Send + 'static,
{
    tokio::spawn(async move {
        let mut events = store.engine().events();

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    tracing::debug!(
                        "Engine event: {} {} {}",
                        event.kind,
                        event.action,
                        event.actor_id
                    );
                    match store.refresh_containers().await {
                        Ok(count) => on_refresh(count),
                        Err(e) => tracing::warn!("Refresh after event failed: {}", e),
                    }
                }
                Err(e) => tracing::warn!("Engine event stream error: {}", e),
            }
        }

        tracing::debug!("Engine event stream closed");
    })
}
