//! Port traits the pipeline drives.
//!
//! Core owns these interfaces and their error taxonomies; the adapters
//! (`ggbake-hf`, `ggbake-docker`) implement them and map their internal
//! errors at the boundary.

pub mod registry;
pub mod toolchain;

pub use registry::{ProgressFn, RegistryClientPort, RegistryError, RegistryResult};
pub use toolchain::{
    BuildLogSinkPort, ImageToolchainPort, NoopBuildLogSink, RegistryCredentials, ToolchainError,
    ToolchainOp, ToolchainResult,
};
