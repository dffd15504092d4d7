use std::path::Path;

use crate::error::PipelineResult;
use crate::models::{DiarizationLine, RawDiarizationTurn, TranscriptionOutput};

/// Parse a diarization JSONL stream: one `{"segment": {...}}` object per
/// line, timestamps in seconds. Lines that do not parse (progress chatter,
/// warnings) are skipped.
pub fn parse_diarization_stream(content: &str) -> Vec<RawDiarizationTurn> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<DiarizationLine>(line).ok())
        .map(|line| RawDiarizationTurn::from_record(&line.segment))
        .collect()
}

/// Parse a transcription stdout stream: the last line that parses as a
/// result object carrying text or segments wins.
pub fn parse_transcription_stream(content: &str) -> Option<TranscriptionOutput> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<TranscriptionOutput>(line).ok())
        .filter(|output| !output.text.is_empty() || !output.segments.is_empty())
        .next_back()
}

/// Read a captured diarization timeline from a file (the offline `align`
/// path works from saved engine output)
pub fn read_diarization_file(path: &Path) -> PipelineResult<Vec<RawDiarizationTurn>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_diarization_stream(&content))
}

/// Read a captured transcription result from a JSON file
pub fn read_transcription_file(path: &Path) -> PipelineResult<TranscriptionOutput> {
    let content = std::fs::read_to_string(path)?;
    let output: TranscriptionOutput = serde_json::from_str(&content)?;
    Ok(output)
}
