//! rskdm - Rust wrapper for the DCP-o-matic command-line tools.
//!
//! This crate provides:
//! - Binary resolution and subprocess execution with typed results.
//! - DCP creation through `dcpomatic2_cli`.
//! - KDM and DKDM issuing through `dcpomatic2_kdm_cli`.
//!
//! Feature flags:
//! - `cli`: enable the `rskdm` binary.
//! - `log`: emit diagnostics through the `log` facade (default).

#[macro_use]
mod macros;

/// DCP creation.
pub mod dcp;
/// Common error types and Result alias.
pub mod error;
/// KDM and DKDM generation.
pub mod kdm;
/// Binary resolution and process execution.
pub mod runner;
/// Shared helper utilities.
pub mod utils;
/// Validity windows and timestamp formatting.
pub mod validity;

#[cfg(test)]
mod testing;

pub use dcp::DcpCreator;
pub use error::{Error, ErrorKind, Result};
pub use kdm::{DkdmKdmRequest, DkdmRequest, KdmGenerator, KdmRequest, KdmType};
pub use runner::{CliResult, Runner};
pub use validity::ValidityWindow;
