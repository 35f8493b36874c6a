//! Hugging Face Hub adapter for ggbake.
//!
//! Implements the core `RegistryClientPort`: repository tree listing,
//! streamed artifact download with byte progress, and raw text fetch for
//! documentation files. Internal errors are mapped to the core registry
//! error taxonomy at the port boundary.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{DefaultRegistryClient, HfRegistryClient};

// Configuration
pub use config::HfClientConfig;

// Silence unused dev-dependency warnings
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
