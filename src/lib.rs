//! reloc: relocate container image references in layered configuration
//! trees.
//!
//! The pipeline is load ([`bundle`]) → detect ([`detect`]) → generate
//! ([`generate`]). Detection finds image references as strings
//! (`repo:tag`) or maps (`repository`/`tag`/`registry`/`digest`) and
//! generation writes an override tree that points each one at a target
//! registry using a [`strategy::PathStrategy`].

pub mod bundle;
pub mod config;
pub mod detect;
pub mod error;
pub mod exit_codes;
pub mod filter;
pub mod generate;
pub mod logging;
pub mod output;
pub mod reference;
pub mod registry;
pub mod strategy;
pub mod values;

#[cfg(test)]
pub(crate) mod test_support;
