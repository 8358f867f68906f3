//! Library side of the `ipp-merge-tables` command.
//!
//! - **config**: optional TOML file overriding the source-table vocabulary
//! - **logging**: `tracing` subscriber setup
//! - **pipeline**: one full run from source tables to written parameter files

pub mod config;
pub mod logging;
pub mod pipeline;
