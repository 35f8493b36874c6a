//! The Docker toolchain: login, build, tag, push, load.
//!
//! Each operation is one subprocess invocation with an argument array. A
//! nonzero exit surfaces the captured stderr verbatim; nothing is retried.

use async_trait::async_trait;
use ggbake_core::{
    BuildLogSinkPort, BuildParameters, ImageRef, ImageToolchainPort, RegistryCredentials,
    ToolchainError, ToolchainOp, ToolchainResult,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::process::{ProcessBackend, ProcessOutput, TokioProcessBackend};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the Docker toolchain.
#[derive(Debug, Clone)]
pub struct DockerConfig {
    /// The container CLI binary to invoke.
    pub program: String,
    /// Registry host used for login when the credentials name none.
    pub default_registry: Option<String>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            default_registry: None,
        }
    }
}

impl DockerConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different CLI binary (e.g. `podman`).
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the registry host used when credentials name none.
    #[must_use]
    pub fn with_default_registry(mut self, registry: impl Into<String>) -> Self {
        self.default_registry = Some(registry.into());
        self
    }
}

// ============================================================================
// Argument assembly
// ============================================================================

fn login_args(username: &str, registry: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "login".to_string(),
        "--username".to_string(),
        username.to_string(),
        "--password-stdin".to_string(),
    ];
    if let Some(registry) = registry {
        args.push(registry.to_string());
    }
    args
}

fn build_args(params: &BuildParameters) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        "--tag".to_string(),
        params.image_tag.clone(),
        "--platform".to_string(),
        params.platform.clone(),
    ];
    for (key, value) in &params.build_args {
        args.push("--build-arg".to_string());
        args.push(format!("{key}={value}"));
    }
    args.push(params.build_context.display().to_string());
    args
}

fn tag_args(source: &ImageRef, target: &str) -> Vec<String> {
    vec![
        "tag".to_string(),
        source.as_str().to_string(),
        target.to_string(),
    ]
}

fn push_args(target: &ImageRef) -> Vec<String> {
    vec!["push".to_string(), target.as_str().to_string()]
}

fn load_args(archive: &Path) -> Vec<String> {
    vec![
        "load".to_string(),
        "--input".to_string(),
        archive.display().to_string(),
    ]
}

/// Turn a finished process into a port-level result.
fn check(op: ToolchainOp, output: ProcessOutput) -> ToolchainResult<ProcessOutput> {
    if output.success {
        return Ok(output);
    }
    let diagnostic = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    debug!(%op, code = ?output.code, "toolchain operation failed");
    Err(ToolchainError::OperationFailed {
        operation: op,
        diagnostic,
    })
}

/// Parse the image reference `docker load` reports on stdout.
fn parse_loaded_image(stdout: &str) -> Option<ImageRef> {
    stdout.lines().find_map(|line| {
        line.trim()
            .strip_prefix("Loaded image: ")
            .or_else(|| line.trim().strip_prefix("Loaded image ID: "))
            .map(|reference| ImageRef::new(reference.trim()))
    })
}

// ============================================================================
// Toolchain
// ============================================================================

/// Default toolchain using real subprocesses.
pub type DefaultDockerToolchain = DockerToolchain<TokioProcessBackend>;

/// Docker CLI toolchain, generic over the process backend for testing.
pub struct DockerToolchain<B: ProcessBackend> {
    backend: B,
    config: DockerConfig,
}

impl DefaultDockerToolchain {
    /// Create a toolchain with the given configuration.
    pub fn new(config: DockerConfig) -> Self {
        Self {
            backend: TokioProcessBackend::new(),
            config,
        }
    }
}

impl<B: ProcessBackend> DockerToolchain<B> {
    /// Create a toolchain with a custom process backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: DockerConfig, backend: B) -> Self {
        Self { backend, config }
    }

    async fn run_op(
        &self,
        op: ToolchainOp,
        args: Vec<String>,
        stdin: Option<&[u8]>,
    ) -> ToolchainResult<ProcessOutput> {
        let output = self
            .backend
            .run(&self.config.program, &args, stdin)
            .await
            .map_err(|e| ToolchainError::Unavailable {
                program: self.config.program.clone(),
                message: e.to_string(),
            })?;
        check(op, output)
    }
}

#[async_trait]
impl<B: ProcessBackend> ImageToolchainPort for DockerToolchain<B> {
    async fn login(&self, credentials: &RegistryCredentials) -> ToolchainResult<()> {
        let registry = credentials
            .registry
            .as_deref()
            .or(self.config.default_registry.as_deref());
        let args = login_args(&credentials.username, registry);
        // The password goes through stdin only; it never appears in argv.
        let mut password = credentials.password.clone();
        password.push('\n');
        let result = self
            .run_op(ToolchainOp::Login, args, Some(password.as_bytes()))
            .await;
        result.map(|_| ())
    }

    async fn build(
        &self,
        params: &BuildParameters,
        logs: Arc<dyn BuildLogSinkPort>,
    ) -> ToolchainResult<ImageRef> {
        info!(tag = %params.image_tag, context = %params.build_context.display(), "docker build");
        let output = self
            .backend
            .run_streamed(&self.config.program, &build_args(params), logs)
            .await
            .map_err(|e| ToolchainError::Unavailable {
                program: self.config.program.clone(),
                message: e.to_string(),
            })?;
        check(ToolchainOp::Build, output)?;
        Ok(ImageRef::new(params.image_tag.clone()))
    }

    async fn tag(&self, source: &ImageRef, target: &str) -> ToolchainResult<ImageRef> {
        self.run_op(ToolchainOp::Tag, tag_args(source, target), None)
            .await?;
        Ok(ImageRef::new(target))
    }

    async fn push(&self, target: &ImageRef) -> ToolchainResult<()> {
        info!(image = %target, "docker push");
        self.run_op(ToolchainOp::Push, push_args(target), None)
            .await?;
        Ok(())
    }

    async fn load(&self, archive: &Path) -> ToolchainResult<Option<ImageRef>> {
        let output = self
            .run_op(ToolchainOp::Load, load_args(archive), None)
            .await?;
        Ok(parse_loaded_image(&output.stdout))
    }
}
