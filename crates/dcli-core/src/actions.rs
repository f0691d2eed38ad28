//! Lifecycle actions: one engine call per (entity kind, verb)

use crate::{CoreError, Result};
use dcli_engine::{ContainerEngine, STOP_TIMEOUT_SECS};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Entity kinds shown by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Container,
    Image,
    Network,
    Volume,
    Stack,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => write!(f, "container"),
            Self::Image => write!(f, "image"),
            Self::Network => write!(f, "network"),
            Self::Volume => write!(f, "volume"),
            Self::Stack => write!(f, "stack"),
        }
    }
}

/// A lifecycle action offered in an options menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Stop,
    Start,
    Remove,
    Restart,
    Pause,
    Unpause,
    ForceRemove,
}

impl Verb {
    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stop => "Stop",
            Self::Start => "Start",
            Self::Remove => "Remove",
            Self::Restart => "Restart",
            Self::Pause => "Pause",
            Self::Unpause => "Unpause",
            Self::ForceRemove => "Force Remove",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verbs offered for an entity kind, in menu order
pub fn verbs_for(kind: EntityKind) -> &'static [Verb] {
    match kind {
        EntityKind::Container => &[
            Verb::Stop,
            Verb::Start,
            Verb::Remove,
            Verb::Restart,
            Verb::Pause,
            Verb::Unpause,
        ],
        EntityKind::Image => &[Verb::Remove, Verb::ForceRemove],
        EntityKind::Network | EntityKind::Volume => &[Verb::Remove],
        EntityKind::Stack => &[],
    }
}

/// Maps a chosen verb on an entity to exactly one engine call
#[derive(Clone)]
pub struct ActionDispatcher {
    engine: Arc<dyn ContainerEngine>,
    stop_settle: Duration,
}

impl ActionDispatcher {
    /// Delay after a successful stop before the caller refreshes
    pub const STOP_SETTLE: Duration = Duration::from_secs(1);

    pub fn new(engine: Arc<dyn ContainerEngine>) -> Self {
        Self {
            engine,
            stop_settle: Self::STOP_SETTLE,
        }
    }

    /// Override the post-stop settle delay
    pub fn with_stop_settle(mut self, settle: Duration) -> Self {
        self.stop_settle = settle;
        self
    }

    /// Apply `verb` to the entity identified by `id`.
    ///
    /// Stop waits for the settle delay after the engine acknowledges it.
    /// Nothing in the snapshot changes here; callers refresh on success.
    pub async fn apply(&self, kind: EntityKind, id: &str, verb: Verb) -> Result<()> {
        tracing::info!("{} {} {}", verb, kind, id);

        match (kind, verb) {
            (EntityKind::Container, Verb::Stop) => {
                self.engine.stop_container(id, STOP_TIMEOUT_SECS).await?;
                tokio::time::sleep(self.stop_settle).await;
            }
            (EntityKind::Container, Verb::Start) => self.engine.start_container(id).await?,
            (EntityKind::Container, Verb::Remove) => {
                self.engine.remove_container(id, true).await?
            }
            (EntityKind::Container, Verb::Restart) => self.engine.restart_container(id).await?,
            (EntityKind::Container, Verb::Pause) => self.engine.pause_container(id).await?,
            (EntityKind::Container, Verb::Unpause) => self.engine.unpause_container(id).await?,
            (EntityKind::Image, Verb::Remove) => self.engine.remove_image(id, false).await?,
            (EntityKind::Image, Verb::ForceRemove) => self.engine.remove_image(id, true).await?,
            (EntityKind::Network, Verb::Remove) => self.engine.remove_network(id).await?,
            (EntityKind::Volume, Verb::Remove) => self.engine.remove_volume(id).await?,
            (kind, verb) => return Err(CoreError::VerbNotApplicable { verb, kind }),
        }

        Ok(())
    }
}
