use std::path::Path;

use tokio::process::Command;
use tracing::info;

use crate::engines::process::run_engine;
use crate::engines::EngineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::io::parse_transcription_stream;
use crate::models::TranscriptionOutput;

/// Run the transcription engine over a mono 16kHz WAV file.
///
/// The whole file is transcribed once with segment timestamps; the engine
/// writes a JSON result object (`{text, segments, language}`) to stdout,
/// possibly after progress lines, and the last parseable object wins.
pub async fn run_transcription(
    wav: &Path,
    config: &EngineConfig,
) -> PipelineResult<TranscriptionOutput> {
    if !config.transcribe_script.exists() {
        return Err(PipelineError::CollaboratorUnavailable {
            engine: "transcription",
            reason: format!("script missing at {}", config.transcribe_script.display()),
        });
    }

    info!("Running whole-file transcription on {:?}", wav);

    let mut command = Command::new(&config.python_bin);
    command.arg(&config.transcribe_script).arg(wav);

    let output = run_engine(
        "transcription",
        command,
        config.timeout,
        config.poll_interval,
    )
    .await?;

    let result = parse_transcription_stream(&output.stdout).ok_or_else(|| {
        PipelineError::CollaboratorFailed {
            engine: "transcription",
            detail: "no transcription result received".to_string(),
        }
    })?;

    info!(
        "Transcription produced {} segments ({} chars)",
        result.segments.len(),
        result.text.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_script_is_unavailable() {
        let config = EngineConfig {
            transcribe_script: "/nonexistent/transcribe.py".into(),
            ..EngineConfig::default()
        };

        let err = run_transcription(Path::new("audio.wav"), &config)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::CollaboratorUnavailable { engine: "transcription", .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_stdout_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("transcribe.py");
        std::fs::write(&script, "pass\n").unwrap();

        let config = EngineConfig {
            transcribe_script: script,
            ..EngineConfig::default()
        };

        let err = run_transcription(Path::new("audio.wav"), &config)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::CollaboratorFailed { engine: "transcription", .. }
        ));
    }
}
