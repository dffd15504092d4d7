use serde::{Deserialize, Serialize};

/// Whole-file output of the transcription engine.
///
/// The engine transcribes the full audio once and returns segment
/// timestamps in seconds; this is preferred over per-region calls for
/// throughput.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionOutput {
    /// Full transcript text
    #[serde(default)]
    pub text: String,
    /// Timestamped segments covering the audio
    #[serde(default)]
    pub segments: Vec<TranscriptionRecord>,
    /// Detected language code, if the engine reports one
    #[serde(default)]
    pub language: Option<String>,
}

/// One timestamped segment as reported by the transcription engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionRecord {
    pub text: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
}

/// A transcription segment in internal millisecond form.
///
/// Ordered and non-overlapping; the alignment stage assigns each token to
/// exactly one diarization turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionToken {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TranscriptionToken {
    /// Convert an engine record, seconds to milliseconds
    pub fn from_record(record: &TranscriptionRecord) -> Self {
        Self {
            text: record.text.clone(),
            start_ms: (record.start * 1000.0) as u64,
            end_ms: (record.end * 1000.0) as u64,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn midpoint_ms(&self) -> f64 {
        (self.start_ms + self.end_ms) as f64 / 2.0
    }
}

impl TranscriptionOutput {
    /// Internal tokens for all engine segments
    pub fn tokens(&self) -> Vec<TranscriptionToken> {
        self.segments.iter().map(TranscriptionToken::from_record).collect()
    }
}
