//! Core logic for dcli
//!
//! This crate provides:
//! - The entity snapshot store shared by the UI and the event listener
//! - Row projection (filtering, ordering, display cells) for every list
//! - Lifecycle action dispatch
//! - The background refresh listener
//! - Markdown detail rendering for every entity kind

mod actions;
pub mod detail;
mod error;
mod listener;
mod rows;
mod store;

pub use actions::*;
pub use error::*;
pub use listener::*;
pub use rows::*;
pub use store::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
