pub mod audio;
pub mod diarization;
pub mod process;
pub mod transcription;

pub use audio::*;
pub use diarization::*;
pub use process::*;
pub use transcription::*;

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PYTHON_BIN: &str = "python3";
const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";

/// Configuration for the external engines.
///
/// Paths and binaries are overridable from the environment so deployments
/// can point at a virtualenv python or vendored scripts without code
/// changes.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Python interpreter used to run the engine scripts
    pub python_bin: String,
    /// Diarization script (emits {"segment": ...} JSONL on stdout)
    pub diarize_script: PathBuf,
    /// Transcription script (emits a JSON result object on stdout)
    pub transcribe_script: PathBuf,
    /// ffmpeg binary for audio conversion
    pub ffmpeg_bin: String,
    /// Wait cap per engine invocation
    pub timeout: Duration,
    /// How often to poll a running engine for exit
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            python_bin: DEFAULT_PYTHON_BIN.to_string(),
            diarize_script: PathBuf::from("scripts/diarize.py"),
            transcribe_script: PathBuf::from("scripts/transcribe.py"),
            ffmpeg_bin: DEFAULT_FFMPEG_BIN.to_string(),
            timeout: Duration::from_secs(600),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl EngineConfig {
    /// Build config from environment overrides, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            python_bin: env_or("COLLOQUY_PYTHON_BIN", defaults.python_bin),
            diarize_script: std::env::var("COLLOQUY_DIARIZE_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.diarize_script),
            transcribe_script: std::env::var("COLLOQUY_TRANSCRIBE_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.transcribe_script),
            ffmpeg_bin: env_or("COLLOQUY_FFMPEG_BIN", defaults.ffmpeg_bin),
            timeout: defaults.timeout,
            poll_interval: defaults.poll_interval,
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
}
