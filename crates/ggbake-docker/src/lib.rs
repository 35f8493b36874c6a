//! Docker CLI adapter for ggbake.
//!
//! Implements the core `ImageToolchainPort` by invoking the `docker` binary
//! as a subprocess. Every invocation is an argument array, never a
//! string-concatenated shell command, and the login password travels via
//! stdin only. Build output is streamed line by line to the caller's log
//! sink as it arrives.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod process;
mod toolchain;

// ============================================================================
// Public API
// ============================================================================

pub use process::{ProcessBackend, ProcessOutput, TokioProcessBackend};
pub use toolchain::{DefaultDockerToolchain, DockerConfig, DockerToolchain};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
