pub mod engines;
pub mod error;
pub mod heuristics;
pub mod io;
pub mod job;
pub mod llm;
pub mod models;
pub mod stages;

pub use engines::{ensure_wav, run_diarization, run_transcription, EngineConfig};
pub use error::{PipelineError, PipelineResult};
pub use heuristics::ResolverConfig;
pub use io::{
    parse_diarization_stream, parse_transcription_stream, read_diarization_file,
    read_transcription_file, write_human_transcript, ResultEnvelope,
};
pub use job::{transcribe_file, JobContext};
pub use llm::{AnthropicClient, AnthropicConfig};
pub use models::{
    RawDiarizationTurn, SpeakerNameMap, SpeakerSegment, SpeakerStats, TranscriptionOutcome,
    TranscriptionOutput, TranscriptionToken,
};
pub use stages::{
    align_tokens, build_outcome, format_transcript, normalize_diarization, resolve_speakers,
    run_pipeline, speaker_stats, AlignConfig, NormalizeConfig, PipelineConfig,
};
