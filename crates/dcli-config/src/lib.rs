//! Configuration for dcli
//!
//! Global configuration lives at `<config dir>/dcli/config.toml`
//! (`~/.config/dcli/config.toml` on Linux).

mod error;
mod global;

pub use error::*;
pub use global::*;
