use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::PipelineResult;
use crate::models::TranscriptionOutcome;

/// Machine-readable result document written for one job
#[derive(Debug, Serialize)]
pub struct ResultEnvelope<'a> {
    /// Job identifier the temp artifacts were scoped under
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(rename = "processedAt")]
    pub processed_at: DateTime<Utc>,
    pub transcript: &'a TranscriptionOutcome,
}

impl<'a> ResultEnvelope<'a> {
    pub fn new(job_id: String, transcript: &'a TranscriptionOutcome) -> Self {
        Self {
            job_id,
            processed_at: Utc::now(),
            transcript,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> PipelineResult<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Write the human-readable transcript rendering to a text file
pub fn write_human_transcript(path: &Path, formatted: &str) -> PipelineResult<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "{}", formatted)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SpeakerSegment, TranscriptionOutcome};
    use std::collections::HashMap;

    fn outcome() -> TranscriptionOutcome {
        TranscriptionOutcome {
            segments: vec![SpeakerSegment {
                speaker_label: "SPEAKER_00".to_string(),
                speaker_name: Some("Asha".to_string()),
                text: "Hello".to_string(),
                start_ms: 0,
                end_ms: 1000,
                confidence: 0.9,
            }],
            formatted_transcript: "Asha: Hello".to_string(),
            stats: HashMap::new(),
            full_text: "Hello".to_string(),
            language: Some("en".to_string()),
            duration_ms: Some(1000),
        }
    }

    #[test]
    fn test_write_json_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let outcome = outcome();

        ResultEnvelope::new("job-1".to_string(), &outcome)
            .write_json(&path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"jobId\": \"job-1\""));
        assert!(written.contains("\"speakerName\": \"Asha\""));
        assert!(written.contains("\"formattedTranscript\""));
    }

    #[test]
    fn test_write_human_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.txt");

        write_human_transcript(&path, "Asha: Hello\n\nSPEAKER_01: Hi").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Asha: Hello"));
    }
}
