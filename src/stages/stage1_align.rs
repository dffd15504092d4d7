use tracing::debug;

use crate::models::{RawDiarizationTurn, SpeakerSegment, TranscriptionToken};

/// Configuration for Stage 1 alignment
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Minimum overlap ratio (overlap / token duration) for a turn to be a candidate
    pub min_overlap_ratio: f64,
    /// Score bonus when the token midpoint falls within the turn
    pub midpoint_bonus: f64,
    /// Confidence assigned to every emitted segment
    pub baseline_confidence: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            min_overlap_ratio: 0.2,
            midpoint_bonus: 0.3,
            baseline_confidence: 0.9,
        }
    }
}

/// Execute Stage 1: Alignment
///
/// Maps each transcription token to its best-matching diarization turn by
/// temporal overlap, falling back to the nearest turn so every token gets a
/// home. Tokens grouped under one turn are concatenated chronologically into
/// one speaker segment; turns with no non-empty text produce no segment.
pub fn align_tokens(
    tokens: &[TranscriptionToken],
    turns: &[RawDiarizationTurn],
    config: &AlignConfig,
) -> Vec<SpeakerSegment> {
    if tokens.is_empty() || turns.is_empty() {
        return Vec::new();
    }

    // First pass: best turn per token.
    let mut assigned: Vec<Vec<usize>> = vec![Vec::new(); turns.len()];
    for (token_idx, token) in tokens.iter().enumerate() {
        let turn_idx = best_turn_for_token(token, turns, config);
        assigned[turn_idx].push(token_idx);
    }

    // Second pass: one segment per turn with text.
    let mut segments: Vec<SpeakerSegment> = Vec::new();
    for (turn_idx, token_indices) in assigned.iter().enumerate() {
        if token_indices.is_empty() {
            continue;
        }

        let turn = &turns[turn_idx];
        let mut ordered = token_indices.clone();
        ordered.sort_by_key(|&i| tokens[i].start_ms);

        let texts: Vec<&str> = ordered
            .iter()
            .map(|&i| tokens[i].text.trim())
            .filter(|t| !t.is_empty())
            .collect();

        if texts.is_empty() {
            debug!(
                "Turn {}..{}ms received only empty tokens; dropping",
                turn.start_ms, turn.end_ms
            );
            continue;
        }

        segments.push(SpeakerSegment {
            speaker_label: turn.speaker_label.clone(),
            speaker_name: None,
            text: texts.join(" "),
            start_ms: turn.start_ms,
            end_ms: turn.end_ms,
            confidence: config.baseline_confidence,
        });
    }

    segments.sort_by_key(|s| s.start_ms);
    segments
}

/// Pick the best-scoring turn for one token.
///
/// Score = overlap_ratio (+ midpoint bonus when the token midpoint falls in
/// `[start, end)`), with candidates below the overlap cutoff discarded.
/// When nothing overlaps, the turn with the nearest midpoint wins.
fn best_turn_for_token(
    token: &TranscriptionToken,
    turns: &[RawDiarizationTurn],
    config: &AlignConfig,
) -> usize {
    let token_duration = token.duration_ms();
    let token_mid = token.midpoint_ms();

    let mut best_idx: Option<usize> = None;
    let mut best_score = 0.0f64;

    for (idx, turn) in turns.iter().enumerate() {
        let overlap_start = token.start_ms.max(turn.start_ms);
        let overlap_end = token.end_ms.min(turn.end_ms);
        if overlap_end <= overlap_start || token_duration == 0 {
            continue;
        }

        let overlap_ratio = (overlap_end - overlap_start) as f64 / token_duration as f64;
        if overlap_ratio < config.min_overlap_ratio {
            continue;
        }

        let midpoint_inside =
            token_mid >= turn.start_ms as f64 && token_mid < turn.end_ms as f64;
        let score = overlap_ratio + if midpoint_inside { config.midpoint_bonus } else { 0.0 };

        if score > best_score {
            best_score = score;
            best_idx = Some(idx);
        }
    }

    best_idx.unwrap_or_else(|| nearest_turn_by_midpoint(token_mid, turns))
}

/// Index of the turn whose midpoint is closest to the given point
fn nearest_turn_by_midpoint(point_ms: f64, turns: &[RawDiarizationTurn]) -> usize {
    let mut nearest = 0usize;
    let mut min_distance = f64::INFINITY;

    for (idx, turn) in turns.iter().enumerate() {
        let distance = (point_ms - turn.midpoint_ms()).abs();
        if distance < min_distance {
            min_distance = distance;
            nearest = idx;
        }
    }

    nearest
}
