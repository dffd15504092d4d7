use std::collections::HashMap;

use crate::models::{SpeakerSegment, SpeakerStats, TranscriptionOutcome};

/// Format the transcript as turn-by-turn text: one "{name}: {text}" line
/// per segment, blank-line separated, in chronological order.
pub fn format_transcript(segments: &[SpeakerSegment]) -> String {
    segments
        .iter()
        .map(|segment| format!("{}: {}", segment.display_name(), segment.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Aggregate per-speaker statistics keyed by display name.
///
/// Word counts are whitespace-token counts; durations sum end minus start.
/// Pure function of the input, no side effects.
pub fn speaker_stats(segments: &[SpeakerSegment]) -> HashMap<String, SpeakerStats> {
    let mut stats: HashMap<String, SpeakerStats> = HashMap::new();

    for segment in segments {
        let entry = stats.entry(segment.display_name().to_string()).or_default();
        entry.segment_count += 1;
        entry.total_words += segment.text.split_whitespace().count();
        entry.total_time_ms += segment.duration_ms();
    }

    stats
}

/// Execute Stage 3: Rendering
///
/// Derives the formatted transcript, per-speaker statistics, full text,
/// and duration from the final segment list.
pub fn build_outcome(
    segments: Vec<SpeakerSegment>,
    language: Option<String>,
) -> TranscriptionOutcome {
    let formatted_transcript = format_transcript(&segments);
    let stats = speaker_stats(&segments);
    let full_text = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let duration_ms = segments.last().map(|s| s.end_ms);

    TranscriptionOutcome {
        segments,
        formatted_transcript,
        stats,
        full_text,
        language,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(label: &str, name: Option<&str>, text: &str, start_ms: u64, end_ms: u64) -> SpeakerSegment {
        SpeakerSegment {
            speaker_label: label.to_string(),
            speaker_name: name.map(String::from),
            text: text.to_string(),
            start_ms,
            end_ms,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_format_transcript() {
        let segments = vec![
            segment("SPEAKER_00", Some("Asha"), "Hello there", 0, 2000),
            segment("SPEAKER_01", None, "Hi Asha", 2500, 4000),
        ];

        let formatted = format_transcript(&segments);

        assert_eq!(formatted, "Asha: Hello there\n\nSPEAKER_01: Hi Asha");
    }

    #[test]
    fn test_speaker_stats_aggregation() {
        let segments = vec![
            segment("SPEAKER_00", Some("Asha"), "one two three", 0, 2000),
            segment("SPEAKER_01", None, "four", 2500, 4000),
            segment("SPEAKER_00", Some("Asha"), "five six", 4500, 5000),
        ];

        let stats = speaker_stats(&segments);

        let asha = &stats["Asha"];
        assert_eq!(asha.segment_count, 2);
        assert_eq!(asha.total_words, 5);
        assert_eq!(asha.total_time_ms, 2500);

        let other = &stats["SPEAKER_01"];
        assert_eq!(other.segment_count, 1);
        assert_eq!(other.total_words, 1);
        assert_eq!(other.total_time_ms, 1500);
    }

    #[test]
    fn test_build_outcome() {
        let segments = vec![
            segment("SPEAKER_00", Some("Asha"), "Hello", 0, 2000),
            segment("SPEAKER_01", None, "Hi", 2500, 4000),
        ];

        let outcome = build_outcome(segments, Some("en".to_string()));

        assert_eq!(outcome.full_text, "Hello Hi");
        assert_eq!(outcome.duration_ms, Some(4000));
        assert_eq!(outcome.language.as_deref(), Some("en"));
        assert_eq!(outcome.segments.len(), 2);
        assert_eq!(outcome.stats.len(), 2);
    }

    #[test]
    fn test_build_outcome_empty() {
        let outcome = build_outcome(Vec::new(), None);

        assert!(outcome.segments.is_empty());
        assert!(outcome.formatted_transcript.is_empty());
        assert!(outcome.full_text.is_empty());
        assert_eq!(outcome.duration_ms, None);
    }
}
