//! Pull handler: list, select, and download one artifact.

use std::path::Path;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::utils::input;
use crate::utils::progress::DownloadProgress;
use ggbake_core::{ArtifactPipeline, PipelineConfig, PipelineState, RepoRef};
use indicatif::HumanBytes;

use super::{ensure_ok, parse_repo};

/// Pull command arguments passed from the CLI.
pub struct PullArgs<'a> {
    pub repo: &'a str,
    pub file: Option<&'a str>,
    pub revision: &'a str,
    pub out: &'a Path,
}

/// Execute the pull command.
pub async fn execute(ctx: &CliContext, args: PullArgs<'_>) -> Result<(), CliError> {
    let repo = parse_repo(args.repo, args.revision)?;
    let pipeline = ctx.pipeline(PipelineConfig::new().with_download_dir(args.out));

    let selected = list_and_select(&pipeline, &repo, args.file).await?;
    let downloaded = download_with_progress(&pipeline, &selected).await?;

    if let Some(download) = &downloaded.download {
        println!(
            "Downloaded '{}' ({})",
            download.destination.display(),
            HumanBytes(download.bytes_downloaded)
        );
    }
    Ok(())
}

/// List the repository and settle on one artifact: the `--file` flag when
/// given, the single match when unambiguous, an interactive pick otherwise.
pub(crate) async fn list_and_select(
    pipeline: &ArtifactPipeline,
    repo: &RepoRef,
    file: Option<&str>,
) -> Result<PipelineState, CliError> {
    let listed = ensure_ok(pipeline.list(&PipelineState::new(), repo).await?)?;

    let files = listed
        .listing
        .as_ref()
        .map(|l| l.files.clone())
        .unwrap_or_default();
    if files.is_empty() {
        return Err(CliError::Validation(format!(
            "no .{} files found in {repo}",
            pipeline.config().artifact_extension
        )));
    }

    let chosen = match file {
        Some(f) => f.to_string(),
        None if files.len() == 1 => files[0].clone(),
        None => input::prompt_selection("Select a file to download", &files)?.to_string(),
    };

    Ok(pipeline.select(&listed, &chosen)?)
}

/// Run the download transition with a terminal progress display.
pub(crate) async fn download_with_progress(
    pipeline: &ArtifactPipeline,
    state: &PipelineState,
) -> Result<PipelineState, CliError> {
    let file_name = state.selected_file_name().unwrap_or("artifact").to_string();
    let progress = DownloadProgress::new(&file_name);

    let downloaded = pipeline
        .download(state, &|done, total| progress.update(done, total))
        .await?;
    progress.finish();

    ensure_ok(downloaded)
}
