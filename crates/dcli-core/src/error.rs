//! Error types for dcli-core

use crate::{EntityKind, Verb};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Engine(#[from] dcli_engine::EngineError),

    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("{verb} is not available for a {kind}")]
    VerbNotApplicable { verb: Verb, kind: EntityKind },
}

pub type Result<T> = std::result::Result<T, CoreError>;
