use std::path::Path;

use tempfile::TempDir;
use tracing::info;
use uuid::Uuid;

use crate::engines::{ensure_wav, run_diarization, run_transcription, EngineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::llm::AnthropicClient;
use crate::models::TranscriptionOutcome;
use crate::stages::{run_pipeline, PipelineConfig};

/// Per-job state for one transcription request.
///
/// Everything derived during a job (temp audio, intermediate files, name
/// maps) hangs off this context rather than process-wide state, so
/// concurrent jobs in one process cannot leak into each other. The temp
/// directory is removed when the context drops, on success and failure
/// alike.
pub struct JobContext {
    pub job_id: Uuid,
    pub engines: EngineConfig,
    pub pipeline: PipelineConfig,
    work_dir: TempDir,
}

impl JobContext {
    pub fn new(engines: EngineConfig, pipeline: PipelineConfig) -> PipelineResult<Self> {
        let work_dir = tempfile::Builder::new().prefix("colloquy-").tempdir()?;
        Ok(Self {
            job_id: Uuid::new_v4(),
            engines,
            pipeline,
            work_dir,
        })
    }

    /// Job-scoped scratch directory for temp artifacts
    pub fn work_path(&self) -> &Path {
        self.work_dir.path()
    }
}

/// Transcribe one audio file end to end: convert, diarize, transcribe,
/// then run the core pipeline.
///
/// Both engine calls are awaited with a bounded wait; either failing fails
/// the whole job (alignment needs both timelines, a partial transcript is
/// never returned). The enrichment client is optional and advisory.
pub async fn transcribe_file(
    audio: &Path,
    ctx: &JobContext,
    enrichment: Option<&AnthropicClient>,
) -> PipelineResult<TranscriptionOutcome> {
    if !audio.exists() {
        return Err(PipelineError::AudioNotFound(audio.to_path_buf()));
    }

    info!("Job {} starting for {:?}", ctx.job_id, audio);

    let wav = ensure_wav(audio, ctx.work_path(), &ctx.engines).await?;
    let raw_turns = run_diarization(&wav, &ctx.engines).await?;
    let transcription = run_transcription(&wav, &ctx.engines).await?;

    let tokens = transcription.tokens();
    let outcome = run_pipeline(
        raw_turns,
        tokens,
        transcription.language,
        enrichment,
        &ctx.pipeline,
    )
    .await;

    info!(
        "Job {} complete: {} segments, {} speakers",
        ctx.job_id,
        outcome.segments.len(),
        outcome.stats.len()
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_contexts_are_isolated() {
        let a = JobContext::new(EngineConfig::default(), PipelineConfig::default()).unwrap();
        let b = JobContext::new(EngineConfig::default(), PipelineConfig::default()).unwrap();

        assert_ne!(a.job_id, b.job_id);
        assert_ne!(a.work_path(), b.work_path());
    }

    #[test]
    fn test_work_dir_removed_on_drop() {
        let ctx = JobContext::new(EngineConfig::default(), PipelineConfig::default()).unwrap();
        let path = ctx.work_path().to_path_buf();
        assert!(path.exists());

        drop(ctx);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_audio_fails_before_engines() {
        let ctx = JobContext::new(EngineConfig::default(), PipelineConfig::default()).unwrap();

        let err = transcribe_file(Path::new("/nonexistent/call.mp3"), &ctx, None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::AudioNotFound(_)));
    }
}
