//! Assistant Service Library Crate
//!
//! Configuration loading and the concrete collaborator adapters used by the
//! `assistant` binary. The binary is a thin wrapper that wires these into an
//! `assistant_core::session::Session`.

pub mod adapters;
pub mod config;
