//! One handler module per subcommand.
//!
//! Handlers are thin: parse/validate inputs, invoke pipeline transitions one
//! user action at a time, render the returned state.

pub mod bake;
pub mod list;
pub mod publish;
pub mod pull;

use crate::error::CliError;
use ggbake_core::{PipelineState, RepoRef};

/// Parse an `owner/name` id plus revision into a repository reference.
pub(crate) fn parse_repo(repo_id: &str, revision: &str) -> Result<RepoRef, CliError> {
    RepoRef::parse(repo_id)
        .map(|r| r.with_revision(revision))
        .ok_or_else(|| {
            CliError::Arguments(format!("repository id must be owner/name, got '{repo_id}'"))
        })
}

/// Turn an absorbed stage failure into a CLI error; pass healthy states
/// through.
pub(crate) fn ensure_ok(state: PipelineState) -> Result<PipelineState, CliError> {
    if state.stage.is_failed() {
        if let Some(failure) = &state.failure {
            return Err(failure.clone().into());
        }
    }
    Ok(state)
}
