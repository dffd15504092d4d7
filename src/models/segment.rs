use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mapping from anonymous speaker label to resolved human name.
///
/// Built once per job and applied uniformly: a name bound to a label is
/// used for every segment carrying that label.
pub type SpeakerNameMap = HashMap<String, String>;

/// The unit the whole pipeline converges on: a span of speech attributed
/// to one speaker, with aligned transcript text.
///
/// Invariants: `start_ms < end_ms` and trimmed text is non-empty (turns
/// with no aligned text produce no segment). Output lists are sorted by
/// `start_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerSegment {
    /// Stable anonymous label (e.g., "SPEAKER_00")
    #[serde(rename = "speaker")]
    pub speaker_label: String,
    /// Best-effort resolved name; absent when unresolved
    #[serde(rename = "speakerName", skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
    pub text: String,
    #[serde(rename = "start")]
    pub start_ms: u64,
    #[serde(rename = "end")]
    pub end_ms: u64,
    pub confidence: f64,
}

impl SpeakerSegment {
    /// Display identity: the resolved name, falling back to the label
    pub fn display_name(&self) -> &str {
        self.speaker_name.as_deref().unwrap_or(&self.speaker_label)
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Aggregate statistics for one resolved speaker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStats {
    /// Number of segments attributed to this speaker
    #[serde(rename = "segments")]
    pub segment_count: usize,
    /// Whitespace-token count over all segment text
    #[serde(rename = "totalWords")]
    pub total_words: usize,
    /// Sum of segment durations in milliseconds
    #[serde(rename = "totalTime")]
    pub total_time_ms: u64,
}

/// Final result of one transcription job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionOutcome {
    pub segments: Vec<SpeakerSegment>,
    /// One "{name}: {text}" line per segment, blank-line separated
    #[serde(rename = "formattedTranscript")]
    pub formatted_transcript: String,
    /// Per-speaker aggregates keyed by display name
    pub stats: HashMap<String, SpeakerStats>,
    #[serde(rename = "fullText")]
    pub full_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_label() {
        let mut segment = SpeakerSegment {
            speaker_label: "SPEAKER_00".to_string(),
            speaker_name: None,
            text: "hello".to_string(),
            start_ms: 0,
            end_ms: 1000,
            confidence: 0.9,
        };
        assert_eq!(segment.display_name(), "SPEAKER_00");

        segment.speaker_name = Some("Priya".to_string());
        assert_eq!(segment.display_name(), "Priya");
    }
}
