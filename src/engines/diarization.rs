use std::path::Path;

use tokio::process::Command;
use tracing::info;

use crate::engines::process::run_engine;
use crate::engines::EngineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::io::parse_diarization_stream;
use crate::models::RawDiarizationTurn;

/// Run the diarization engine over a mono 16kHz WAV file.
///
/// The engine writes one `{"segment": {speaker, start, end}}` JSON object
/// per line to stdout with timestamps in seconds; unparseable lines are
/// skipped. Zero detected regions is not an error here; the pipeline
/// produces an empty transcript for it.
pub async fn run_diarization(
    wav: &Path,
    config: &EngineConfig,
) -> PipelineResult<Vec<RawDiarizationTurn>> {
    if !config.diarize_script.exists() {
        return Err(PipelineError::CollaboratorUnavailable {
            engine: "diarization",
            reason: format!("script missing at {}", config.diarize_script.display()),
        });
    }

    info!("Running speaker diarization on {:?}", wav);

    let mut command = Command::new(&config.python_bin);
    command.arg(&config.diarize_script).arg(wav);

    let output = run_engine("diarization", command, config.timeout, config.poll_interval).await?;
    let turns = parse_diarization_stream(&output.stdout);

    info!("Diarization produced {} speech regions", turns.len());
    Ok(turns)
}
