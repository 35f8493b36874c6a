//! Container toolchain port trait.

use crate::domain::{BuildParameters, ImageRef};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Credentials for a container registry login.
///
/// The password is handed to the external tool once (via stdin) and not
/// retained in-process beyond the call.
#[derive(Clone)]
pub struct RegistryCredentials {
    /// Registry account name.
    pub username: String,
    /// Registry password or access token.
    pub password: String,
    /// Registry host; the toolchain's default registry when `None`.
    pub registry: Option<String>,
}

impl RegistryCredentials {
    /// Create credentials for the toolchain's default registry.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            registry: None,
        }
    }

    /// Target a specific registry host.
    #[must_use]
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }
}

// Manual Debug so the password never reaches logs.
impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("registry", &self.registry)
            .finish()
    }
}

/// The discrete toolchain operations, used to name failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainOp {
    /// Registry login
    Login,
    /// Image build from a context directory
    Build,
    /// Re-tagging an image
    Tag,
    /// Pushing an image to a registry
    Push,
    /// Loading an image from an archive
    Load,
}

impl ToolchainOp {
    /// Lowercase operation name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Build => "build",
            Self::Tag => "tag",
            Self::Push => "push",
            Self::Load => "load",
        }
    }
}

impl fmt::Display for ToolchainOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from toolchain port operations.
///
/// None of these are retried automatically; a single attempt is surfaced to
/// the caller, who may re-trigger manually.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The external tool ran and reported failure.
    #[error("{operation} failed: {diagnostic}")]
    OperationFailed {
        /// Which operation failed
        operation: ToolchainOp,
        /// Captured standard-error text, verbatim
        diagnostic: String,
    },

    /// The external tool could not be launched at all.
    #[error("could not run {program}: {message}")]
    Unavailable {
        /// The program that failed to launch
        program: String,
        /// Launch error description
        message: String,
    },
}

impl ToolchainError {
    /// The operation this failure belongs to, when the tool ran.
    pub const fn operation(&self) -> Option<ToolchainOp> {
        match self {
            Self::OperationFailed { operation, .. } => Some(*operation),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Result type alias for toolchain port operations.
pub type ToolchainResult<T> = Result<T, ToolchainError>;

/// Sink for build log lines, fed as they arrive rather than buffered.
pub trait BuildLogSinkPort: Send + Sync {
    /// Append one output line. `stream` is `"stdout"` or `"stderr"`.
    fn append(&self, stream: &str, line: String);
}

/// A log sink that discards all lines.
///
/// Lines still reach tracing inside the adapter.
#[derive(Debug, Clone, Default)]
pub struct NoopBuildLogSink;

impl BuildLogSinkPort for NoopBuildLogSink {
    fn append(&self, _stream: &str, _line: String) {}
}

/// Port trait for the container build/push toolchain.
///
/// Each operation is one synchronous external invocation returning success or
/// the tool's captured diagnostic text.
#[async_trait]
pub trait ImageToolchainPort: Send + Sync {
    /// Log in to a registry. Credentials persist only in the external tool's
    /// own credential store.
    async fn login(&self, credentials: &RegistryCredentials) -> ToolchainResult<()>;

    /// Build an image from a context directory, streaming log lines to
    /// `logs` as they arrive. Returns a handle to the built image.
    async fn build(
        &self,
        params: &BuildParameters,
        logs: Arc<dyn BuildLogSinkPort>,
    ) -> ToolchainResult<ImageRef>;

    /// Apply `target` as an additional reference to `source`.
    async fn tag(&self, source: &ImageRef, target: &str) -> ToolchainResult<ImageRef>;

    /// Push an image reference to its registry.
    async fn push(&self, target: &ImageRef) -> ToolchainResult<()>;

    /// Load an image from an archive file. Returns the reference the tool
    /// reported, when it reported one.
    async fn load(&self, archive: &Path) -> ToolchainResult<Option<ImageRef>>;
}
