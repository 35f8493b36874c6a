//! Core domain for ggbake: the artifact pipeline, its value types, and the
//! ports it drives.
//!
//! This crate is pure domain logic. All I/O goes through the port traits in
//! [`ports`]; the Hugging Face and Docker adapters live in `ggbake-hf` and
//! `ggbake-docker`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod metadata;
pub mod pipeline;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    ArtifactListing, BuildParameters, DownloadState, ImageRef, PromptMetadata, RepoRef,
    progress_percent,
};
pub use metadata::extract_field;
pub use pipeline::{
    ArtifactPipeline, PipelineConfig, PipelineState, PublishError, PublishRequest, Stage,
    StageFailure, StageOp, ValidationError,
};
pub use ports::{
    BuildLogSinkPort, ImageToolchainPort, NoopBuildLogSink, ProgressFn, RegistryClientPort,
    RegistryCredentials, RegistryError, RegistryResult, ToolchainError, ToolchainOp,
    ToolchainResult,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
