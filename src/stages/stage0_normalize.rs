use tracing::{info, warn};

use crate::models::RawDiarizationTurn;

/// Configuration for diarization normalization
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Maximum gap between same-speaker fragments to merge, in milliseconds
    pub merge_gap_ms: u64,
    /// Minimum turn count before single-speaker repair is attempted
    pub repair_min_turns: usize,
    /// Multiplier applied to the average inter-turn gap for the repair threshold
    pub repair_gap_factor: f64,
    /// Lower bound on the repair gap threshold, in milliseconds
    pub repair_gap_floor_ms: u64,
    /// Divisor for the forced-alternation period (turns / divisor)
    pub alternation_divisor: usize,
    /// Minimum forced-alternation period in turns
    pub alternation_min_period: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            merge_gap_ms: 500,
            repair_min_turns: 3,
            repair_gap_factor: 1.5,
            repair_gap_floor_ms: 1000,
            alternation_divisor: 8,
            alternation_min_period: 3,
        }
    }
}

/// Result of Stage 0 normalization
#[derive(Debug)]
pub struct NormalizeResult {
    /// Merged (and possibly repaired) turns, ordered by start time
    pub turns: Vec<RawDiarizationTurn>,
    /// Diagnostics for observability
    pub diagnostics: NormalizeDiagnostics,
}

/// Unique-speaker counts at each stage of normalization
#[derive(Debug, Clone, Default)]
pub struct NormalizeDiagnostics {
    pub input_turns: usize,
    pub merged_turns: usize,
    pub speakers_after_merge: usize,
    pub speakers_after_repair: usize,
    /// Whether single-speaker repair ran
    pub repair_applied: bool,
    /// Speaker switches introduced by gap analysis during repair
    pub gap_switches: usize,
}

/// Synthetic labels used when repairing single-speaker output
const REPAIR_LABEL_A: &str = "SPEAKER_00";
const REPAIR_LABEL_B: &str = "SPEAKER_01";

/// Execute Stage 0: Diarization normalization
///
/// 1. Sorts raw turns by start time
/// 2. Merges adjacent same-speaker fragments within the gap threshold
/// 3. Detects degenerate single-speaker output and recovers turn-taking
///    structure from gap statistics alone
///
/// Repair operates on the raw fragment timeline, not the merged one: the
/// merge collapses exactly the short inter-fragment gaps the repair needs
/// to measure. The repaired fragments are merged again afterwards, so a
/// recovered speaker change survives as a turn boundary.
pub fn normalize_diarization(
    mut raw_turns: Vec<RawDiarizationTurn>,
    config: &NormalizeConfig,
) -> NormalizeResult {
    raw_turns.sort_by_key(|t| t.start_ms);

    let mut diagnostics = NormalizeDiagnostics {
        input_turns: raw_turns.len(),
        ..Default::default()
    };

    let mut turns = merge_adjacent_turns(raw_turns.clone(), config.merge_gap_ms);
    diagnostics.merged_turns = turns.len();
    diagnostics.speakers_after_merge = unique_speaker_count(&turns);
    diagnostics.speakers_after_repair = diagnostics.speakers_after_merge;

    info!(
        "Normalized {} diarization fragments into {} turns ({} speakers)",
        diagnostics.input_turns, diagnostics.merged_turns, diagnostics.speakers_after_merge
    );

    if diagnostics.speakers_after_merge == 1 && raw_turns.len() > config.repair_min_turns {
        warn!("Only one speaker detected; recovering turn structure from gap statistics");
        diagnostics.repair_applied = true;
        diagnostics.gap_switches = repair_single_speaker(&mut raw_turns, config);

        turns = merge_adjacent_turns(raw_turns, config.merge_gap_ms);
        diagnostics.merged_turns = turns.len();
        diagnostics.speakers_after_repair = unique_speaker_count(&turns);

        info!(
            "Repair produced {} speakers over {} turns ({} gap-based switches)",
            diagnostics.speakers_after_repair,
            diagnostics.merged_turns,
            diagnostics.gap_switches
        );
        if diagnostics.speakers_after_repair == 1 {
            warn!("Repair did not separate speakers; transcript will carry one label");
        }
    }

    NormalizeResult { turns, diagnostics }
}

/// Merge adjacent same-speaker turns separated by at most `gap_ms`.
///
/// Input is sorted by start time first; each merged turn keeps the earliest
/// start and latest end of its constituents. Running the merge twice yields
/// the same result as once.
pub fn merge_adjacent_turns(
    mut raw_turns: Vec<RawDiarizationTurn>,
    gap_ms: u64,
) -> Vec<RawDiarizationTurn> {
    raw_turns.sort_by_key(|t| t.start_ms);

    let mut merged: Vec<RawDiarizationTurn> = Vec::with_capacity(raw_turns.len());

    for turn in raw_turns {
        let should_merge = merged.last().is_some_and(|last| {
            last.speaker_label == turn.speaker_label
                && turn.start_ms.saturating_sub(last.end_ms) <= gap_ms
        });

        if should_merge {
            let last = merged.last_mut().unwrap();
            last.end_ms = last.end_ms.max(turn.end_ms);
        } else {
            merged.push(turn);
        }
    }

    merged
}

/// Recover two-speaker turn-taking from a single-speaker turn list.
///
/// Uses only timing: a gap larger than `max(avg_gap * factor, floor)` flips
/// the current speaker. When no gap ever exceeds the threshold, falls back
/// to forced alternation every `max(min_period, turns / divisor)` turns so
/// gap-free recordings still receive some turn structure.
///
/// Returns the number of gap-based switches.
fn repair_single_speaker(turns: &mut [RawDiarizationTurn], config: &NormalizeConfig) -> usize {
    let gaps: Vec<u64> = turns
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[1].start_ms.saturating_sub(pair[0].end_ms);
            (gap > 0).then_some(gap)
        })
        .collect();

    let avg_gap = if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().sum::<u64>() as f64 / gaps.len() as f64
    };
    let gap_threshold = (avg_gap * config.repair_gap_factor).max(config.repair_gap_floor_ms as f64);

    info!(
        "Repair gap statistics: avg {:.0}ms, threshold {:.0}ms",
        avg_gap, gap_threshold
    );

    let mut current = REPAIR_LABEL_A;
    let mut switches = 0usize;
    let mut last_end = 0u64;

    for (i, turn) in turns.iter_mut().enumerate() {
        if i > 0 && (turn.start_ms.saturating_sub(last_end)) as f64 > gap_threshold {
            current = toggle(current);
            switches += 1;
        }
        last_end = turn.end_ms;
        turn.speaker_label = current.to_string();
    }

    if switches == 0 {
        // No gap crossed the threshold; fall back to periodic alternation.
        let period = config
            .alternation_min_period
            .max(turns.len() / config.alternation_divisor);

        let mut current = REPAIR_LABEL_A;
        for (i, turn) in turns.iter_mut().enumerate() {
            if i > 0 && i % period == 0 {
                current = toggle(current);
            }
            turn.speaker_label = current.to_string();
        }
    }

    switches
}

fn toggle(label: &str) -> &'static str {
    if label == REPAIR_LABEL_A {
        REPAIR_LABEL_B
    } else {
        REPAIR_LABEL_A
    }
}

/// Count distinct speaker labels
pub fn unique_speaker_count(turns: &[RawDiarizationTurn]) -> usize {
    let mut labels: Vec<&str> = turns.iter().map(|t| t.speaker_label.as_str()).collect();
    labels.sort();
    labels.dedup();
    labels.len()
}
