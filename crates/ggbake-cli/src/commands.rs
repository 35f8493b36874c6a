//! Subcommand definitions.

use clap::Subcommand;
use std::path::PathBuf;

/// All ggbake subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// List quantized model files in a Hub repository
    List {
        /// Repository id (owner/name)
        repo: String,

        /// Branch, tag, or commit hash
        #[arg(long, default_value = "main")]
        revision: String,
    },

    /// Download a quantized model file
    Pull {
        /// Repository id (owner/name)
        repo: String,

        /// File to download; prompted for when omitted and several match
        #[arg(long)]
        file: Option<String>,

        /// Branch, tag, or commit hash
        #[arg(long, default_value = "main")]
        revision: String,

        /// Directory to download into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Download a model and build a container image around it
    Bake {
        /// Repository id (owner/name)
        repo: String,

        /// File to download; prompted for when omitted and several match
        #[arg(long)]
        file: Option<String>,

        /// Branch, tag, or commit hash
        #[arg(long, default_value = "main")]
        revision: String,

        /// Tag for the built image
        #[arg(long)]
        tag: String,

        /// Build context directory (must contain the Dockerfile)
        #[arg(long, default_value = ".")]
        context: PathBuf,

        /// Target platform for the build
        #[arg(long, default_value = "linux/arm64")]
        platform: String,

        /// Prompt template to use when the README documents none
        #[arg(long)]
        prompt_template: Option<String>,

        /// Reverse prompt to use when the README documents none
        #[arg(long)]
        reverse_prompt: Option<String>,

        /// Push the image after a successful build (asks for confirmation)
        #[arg(long)]
        push: bool,

        /// Reference to push; defaults to the build tag
        #[arg(long)]
        push_tag: Option<String>,

        /// Directory to download into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Load an image archive, tag it, and push it to a registry
    Publish {
        /// Full target reference (name:tag)
        #[arg(long)]
        image: String,

        /// Image archive produced by `docker save`
        #[arg(long)]
        archive: PathBuf,

        /// Registry username; prompted for when omitted
        #[arg(long)]
        username: Option<String>,

        /// Registry password; prompted for when neither flag nor env is set
        #[arg(long, env = "GGBAKE_REGISTRY_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Registry host (the toolchain default when omitted)
        #[arg(long)]
        registry: Option<String>,
    },
}
