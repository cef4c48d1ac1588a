//! Configuration model for reloc.
//!
//! This module defines the `RelocConfig` struct that represents `reloc.yaml`.
//! Unknown fields are ignored, optional fields have defaults, and `validate`
//! checks mappings and filter patterns before a run starts.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

pub use model::RelocConfig;
pub use types::{DEFAULT_CONFIG_FILE, MappingEntry};
