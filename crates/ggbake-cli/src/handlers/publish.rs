//! Publish handler: login, load an image archive, tag, push.

use std::path::PathBuf;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::utils::input;
use ggbake_core::{PipelineConfig, PublishRequest, RegistryCredentials};

/// Publish command arguments passed from the CLI.
pub struct PublishArgs {
    pub image: String,
    pub archive: PathBuf,
    pub username: Option<String>,
    pub password: Option<String>,
    pub registry: Option<String>,
}

/// Execute the publish command.
pub async fn execute(ctx: &CliContext, args: PublishArgs) -> Result<(), CliError> {
    if !args.archive.is_file() {
        return Err(CliError::Arguments(format!(
            "archive not found: {}",
            args.archive.display()
        )));
    }

    let username = match args.username {
        Some(u) => u,
        None => input::prompt_string("Registry username")?,
    };
    let password = match args.password {
        Some(p) => p,
        None => input::prompt_string("Registry password")?,
    };

    let mut credentials = RegistryCredentials::new(username, password);
    if let Some(registry) = args.registry {
        credentials = credentials.with_registry(registry);
    }

    let pipeline = ctx.pipeline(PipelineConfig::new());
    let request = PublishRequest {
        credentials,
        archive: args.archive,
        target: args.image,
    };

    let image = pipeline.publish(&request).await?;
    println!("Image {image} uploaded successfully.");
    Ok(())
}
