use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::info;

use crate::engines::process::run_engine;
use crate::engines::EngineConfig;
use crate::error::{PipelineError, PipelineResult};

/// Audio extensions the pipeline accepts for conversion
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "webm", "flac"];

/// Ensure a WAV file exists for the engines.
///
/// WAV input is used as-is; anything else is converted to mono 16 kHz WAV
/// inside the job work directory (the format the diarization engine
/// requires). Unsupported formats are rejected before any engine runs.
pub async fn ensure_wav(
    input: &Path,
    work_dir: &Path,
    config: &EngineConfig,
) -> PipelineResult<PathBuf> {
    if !input.exists() {
        return Err(PipelineError::AudioNotFound(input.to_path_buf()));
    }

    let extension = input
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(PipelineError::InvalidInput(format!(
            "unsupported audio format \"{extension}\" (expected one of: {})",
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    if extension == "wav" {
        return Ok(input.to_path_buf());
    }

    let stem = input
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("audio");
    let output = work_dir.join(format!("{stem}.wav"));

    info!("Converting {:?} to mono 16kHz WAV", input);

    let mut command = Command::new(&config.ffmpeg_bin);
    command
        .arg("-i")
        .arg(input)
        .args(["-ar", "16000", "-ac", "1", "-f", "wav"])
        .arg(&output)
        .arg("-y");

    run_engine("ffmpeg", command, config.timeout, config.poll_interval).await?;

    if !output.exists() {
        return Err(PipelineError::CollaboratorFailed {
            engine: "ffmpeg",
            detail: "conversion produced no output file".to_string(),
        });
    }

    Ok(output)
}
