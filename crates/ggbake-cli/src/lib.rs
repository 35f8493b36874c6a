//! CLI adapter for ggbake.
//!
//! Thin presentation layer: parses arguments, renders pipeline state, and
//! re-invokes the pipeline once per user action. All orchestration lives in
//! `ggbake-core`.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod utils;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
