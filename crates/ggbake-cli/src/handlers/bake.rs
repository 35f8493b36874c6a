//! Bake handler: the full pipeline from repository listing to a built
//! (optionally pushed) image.

use std::path::PathBuf;
use std::sync::Arc;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::utils::input;
use ggbake_core::{BuildLogSinkPort, PipelineConfig};

use super::{ensure_ok, parse_repo, pull};

/// Bake command arguments passed from the CLI.
pub struct BakeArgs {
    pub repo: String,
    pub file: Option<String>,
    pub revision: String,
    pub tag: String,
    pub context: PathBuf,
    pub platform: String,
    pub prompt_template: Option<String>,
    pub reverse_prompt: Option<String>,
    pub push: bool,
    pub push_tag: Option<String>,
    pub out: PathBuf,
}

/// Build log sink that relays each line to the operator as it arrives.
struct ConsoleLogSink;

impl BuildLogSinkPort for ConsoleLogSink {
    fn append(&self, _stream: &str, line: String) {
        println!("{line}");
    }
}

/// Execute the bake command.
pub async fn execute(ctx: &CliContext, args: BakeArgs) -> Result<(), CliError> {
    let repo = parse_repo(&args.repo, &args.revision)?;
    let pipeline = ctx.pipeline(
        PipelineConfig::new()
            .with_download_dir(args.out.clone())
            .with_build_context(args.context.clone())
            .with_platform(args.platform.clone()),
    );

    // list → select → download
    let selected = pull::list_and_select(&pipeline, &repo, args.file.as_deref()).await?;
    let downloaded = pull::download_with_progress(&pipeline, &selected).await?;

    // resolve metadata from the repository README
    let mut resolved = ensure_ok(pipeline.resolve_metadata(&downloaded).await?)?;

    // Manual fallback for whichever fields extraction left empty; each field
    // falls back on its own.
    if resolved.needs_prompt_template() || resolved.wants_reverse_prompt() {
        let template = if resolved.needs_prompt_template() {
            match &args.prompt_template {
                Some(t) => Some(t.clone()),
                None => Some(input::prompt_string("Prompt template")?),
            }
        } else {
            None
        };
        let reverse = if resolved.wants_reverse_prompt() {
            match &args.reverse_prompt {
                Some(r) => Some(r.clone()),
                None => {
                    let entered =
                        input::prompt_string_with_default("Reverse prompt (optional)", Some(""))?;
                    (!entered.is_empty()).then_some(entered)
                }
            }
        } else {
            None
        };
        resolved = pipeline.supply_metadata(&resolved, template.as_deref(), reverse.as_deref())?;
    }

    if let Some(metadata) = &resolved.metadata {
        if let Some(template) = &metadata.prompt_template {
            println!("Prompt template: {template}");
        }
        if let Some(reverse) = &metadata.reverse_prompt {
            println!("Reverse prompt: {reverse}");
        }
    }

    // parameterize → build
    let parameterized = pipeline.parameterize(&resolved, &args.tag)?;
    println!("Building image {}...", args.tag);
    let built = ensure_ok(pipeline.build(&parameterized, Arc::new(ConsoleLogSink)).await?)?;
    println!("Image {} built successfully.", args.tag);

    // Optional push, gated behind explicit confirmation.
    if args.push {
        let target = args.push_tag.clone().unwrap_or_else(|| args.tag.clone());
        if input::prompt_confirmation(&format!("Push {target} to the registry?"))? {
            let tagged = ensure_ok(pipeline.tag(&built, &target).await?)?;
            let _pushed = ensure_ok(pipeline.push(&tagged).await?)?;
            println!("Image {target} pushed.");
        }
    }

    Ok(())
}
