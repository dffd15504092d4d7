use serde::{Deserialize, Serialize};

/// One speech region as reported by the diarization engine.
///
/// The engine emits JSONL on stdout, one `{"segment": {...}}` object per
/// detected region, with timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationRecord {
    /// Anonymous speaker label (e.g., "SPEAKER_00")
    pub speaker: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
}

/// Wrapper for one diarization stdout line
#[derive(Debug, Clone, Deserialize)]
pub struct DiarizationLine {
    pub segment: DiarizationRecord,
}

/// A diarization turn in internal millisecond form.
///
/// Raw engine output is fragmented: the same speaker often appears as many
/// short regions. The normalize stage merges these into coherent turns; the
/// type is the same before and after merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDiarizationTurn {
    /// Anonymous speaker label, stable within one job
    pub speaker_label: String,
    /// Start timestamp in milliseconds
    pub start_ms: u64,
    /// End timestamp in milliseconds
    pub end_ms: u64,
}

impl RawDiarizationTurn {
    /// Convert an engine record, seconds to milliseconds
    pub fn from_record(record: &DiarizationRecord) -> Self {
        Self {
            speaker_label: record.speaker.clone(),
            start_ms: (record.start * 1000.0) as u64,
            end_ms: (record.end * 1000.0) as u64,
        }
    }

    /// Duration of this turn in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Temporal midpoint in milliseconds
    pub fn midpoint_ms(&self) -> f64 {
        (self.start_ms + self.end_ms) as f64 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_from_record() {
        let record = DiarizationRecord {
            speaker: "SPEAKER_00".to_string(),
            start: 1.5,
            end: 3.25,
        };

        let turn = RawDiarizationTurn::from_record(&record);

        assert_eq!(turn.speaker_label, "SPEAKER_00");
        assert_eq!(turn.start_ms, 1500);
        assert_eq!(turn.end_ms, 3250);
        assert_eq!(turn.duration_ms(), 1750);
    }

    #[test]
    fn test_midpoint() {
        let turn = RawDiarizationTurn {
            speaker_label: "SPEAKER_00".to_string(),
            start_ms: 1000,
            end_ms: 2000,
        };
        assert_eq!(turn.midpoint_ms(), 1500.0);
    }
}
