use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors a transcription job can surface to the caller.
///
/// Enrichment failures are deliberately absent: the LLM collaborator is
/// advisory, so its failures are logged and the job continues on local
/// heuristics. Zero speech after normalization is also not an error; the
/// job succeeds with an empty segment list.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid audio, rejected before any engine runs
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Audio file does not exist
    #[error("audio file not found: {0}")]
    AudioNotFound(PathBuf),

    /// An engine is unreachable or misconfigured
    #[error("{engine} engine unavailable: {reason}")]
    CollaboratorUnavailable {
        engine: &'static str,
        reason: String,
    },

    /// An engine ran but exited with a failure
    #[error("{engine} engine failed: {detail}")]
    CollaboratorFailed {
        engine: &'static str,
        detail: String,
    },

    /// An engine exceeded its wait cap and was killed
    #[error("{engine} engine timed out after {waited_secs}s")]
    CollaboratorTimeout {
        engine: &'static str,
        waited_secs: u64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
