//! fontparts
//!
//! An environment-agnostic object model for font sources. The [`objects`]
//! traits carry the public behavior and the [`memory`] environment backs
//! them with in-memory data loaded from and saved to UFO.
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod memory;
pub mod normalizers;
pub mod objects;

pub use error::{Error, Result};
pub use memory::MemoryFont;
pub use objects::prelude;
