//! CLI composition root.
//!
//! The only place where infrastructure is wired together: the Hub client and
//! the Docker toolchain are constructed here and handed to the pipeline as
//! ports. Handlers never instantiate adapters themselves.

use std::sync::Arc;
use std::time::Duration;

use ggbake_core::{ArtifactPipeline, ImageToolchainPort, PipelineConfig, RegistryClientPort};
use ggbake_docker::{DefaultDockerToolchain, DockerConfig};
use ggbake_hf::{DefaultRegistryClient, HfClientConfig};

/// Environment variable holding a Hub access token for private repos.
const HF_TOKEN_ENV: &str = "HF_TOKEN";

/// CLI-level configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Hub token for private repositories.
    pub hf_token: Option<String>,
    /// HTTP timeout for registry calls.
    pub timeout: Duration,
    /// Container CLI binary to invoke.
    pub docker_program: String,
}

impl CliConfig {
    /// Resolve configuration from the process environment.
    pub fn with_defaults() -> Self {
        Self {
            hf_token: std::env::var(HF_TOKEN_ENV).ok().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(30),
            docker_program: "docker".to_string(),
        }
    }
}

/// Wired-up adapters shared by all handlers.
pub struct CliContext {
    registry: Arc<dyn RegistryClientPort>,
    toolchain: Arc<dyn ImageToolchainPort>,
}

impl CliContext {
    /// Build a pipeline over the shared adapters with per-command settings.
    pub fn pipeline(&self, config: PipelineConfig) -> ArtifactPipeline {
        ArtifactPipeline::new(self.registry.clone(), self.toolchain.clone(), config)
    }
}

/// Construct the adapters from configuration.
pub fn bootstrap(config: &CliConfig) -> CliContext {
    tracing::debug!(
        docker = %config.docker_program,
        has_token = config.hf_token.is_some(),
        "bootstrapping adapters"
    );
    let hf = DefaultRegistryClient::new(
        HfClientConfig::new()
            .with_optional_token(config.hf_token.clone())
            .with_timeout(config.timeout),
    );
    let docker = DefaultDockerToolchain::new(
        DockerConfig::new().with_program(config.docker_program.as_str()),
    );

    CliContext {
        registry: Arc::new(hf),
        toolchain: Arc::new(docker),
    }
}
