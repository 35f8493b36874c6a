//! List handler: show the matching artifacts in a repository.

use crate::bootstrap::CliContext;
use crate::error::CliError;
use ggbake_core::{PipelineConfig, PipelineState};

use super::{ensure_ok, parse_repo};

/// Execute the list command.
pub async fn execute(ctx: &CliContext, repo_id: &str, revision: &str) -> Result<(), CliError> {
    let repo = parse_repo(repo_id, revision)?;
    let pipeline = ctx.pipeline(PipelineConfig::new());

    let state = ensure_ok(pipeline.list(&PipelineState::new(), &repo).await?)?;
    match &state.listing {
        Some(listing) if !listing.is_empty() => {
            println!("Files in {repo} ({} matching):", listing.files.len());
            for file in &listing.files {
                println!("  {file}");
            }
        }
        _ => {
            println!(
                "No .{} files found in {repo}.",
                pipeline.config().artifact_extension
            );
        }
    }
    Ok(())
}
