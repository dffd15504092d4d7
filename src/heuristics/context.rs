use regex::Regex;
use tracing::debug;

use crate::models::{SpeakerNameMap, SpeakerSegment};

use super::{is_capitalized_word, ResolverConfig};

/// Ordered contextual address patterns: a name immediately followed by
/// from/ma'am/sir or end-of-text, a leading "Name from/ma'am/sir", or a
/// trailing "from/by Name".
fn context_patterns() -> Vec<Regex> {
    [
        r"(?i:i\s+am|i'?m)\s+([A-Z][a-z]+)(?:(?i:\s+from|\s+ma'?am|\s+sir)|$)",
        r"(?i:this\s+is)\s+([A-Z][a-z]+)(?:(?i:\s+from|\s+ma'?am|\s+sir)|$)",
        r"^([A-Z][a-z]+)(?i:\s+(?:from|ma'?am|sir))",
        r"(?i:from|by)\s+([A-Z][a-z]+)(?:(?i:\s+ma'?am|\s+sir)|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("context pattern compiles"))
    .collect()
}

/// Pass 2: bind remaining labels from contextual address phrasing.
///
/// Unlike pass 1 this scans every segment; candidates are a single
/// capitalized token and are rejected when they appear in the common-word
/// exclusion list or are already bound to another label.
pub fn detect_contextual_names(
    segments: &[SpeakerSegment],
    names: &mut SpeakerNameMap,
    config: &ResolverConfig,
) {
    let patterns = context_patterns();

    for segment in segments {
        if names.contains_key(&segment.speaker_label) {
            continue;
        }

        for pattern in &patterns {
            let Some(candidate) = pattern
                .captures(&segment.text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
            else {
                continue;
            };

            // First token only; the patterns capture a single word but the
            // guard keeps cleanup uniform with pass 1.
            let Some(name) = candidate.split_whitespace().next() else {
                continue;
            };

            if !accept_context_name(name, names, config) {
                continue;
            }

            debug!(
                "Context bound {} -> \"{}\" from: \"{}\"",
                segment.speaker_label,
                name,
                segment.text.chars().take(50).collect::<String>()
            );
            names.insert(segment.speaker_label.clone(), name.to_string());
            break;
        }
    }
}

fn accept_context_name(name: &str, names: &SpeakerNameMap, config: &ResolverConfig) -> bool {
    name.len() >= config.min_name_chars
        && is_capitalized_word(name)
        && !config
            .common_words
            .iter()
            .any(|word| word.eq_ignore_ascii_case(name))
        && !names.values().any(|used| used == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(label: &str, text: &str) -> SpeakerSegment {
        SpeakerSegment {
            speaker_label: label.to_string(),
            speaker_name: None,
            text: text.to_string(),
            start_ms: 0,
            end_ms: 1000,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_name_before_from() {
        let segments = vec![segment("SPEAKER_00", "I am Harshana from the billing team")];
        let mut names = SpeakerNameMap::new();

        detect_contextual_names(&segments, &mut names, &ResolverConfig::default());

        assert_eq!(
            names.get("SPEAKER_00").map(String::as_str),
            Some("Harshana")
        );
    }

    #[test]
    fn test_leading_name_with_honorific() {
        let segments = vec![segment("SPEAKER_01", "Meera ma'am will call you back")];
        let mut names = SpeakerNameMap::new();

        detect_contextual_names(&segments, &mut names, &ResolverConfig::default());

        assert_eq!(names.get("SPEAKER_01").map(String::as_str), Some("Meera"));
    }

    #[test]
    fn test_common_word_rejected() {
        let segments = vec![segment("SPEAKER_00", "I am Okay")];
        let mut names = SpeakerNameMap::new();

        detect_contextual_names(&segments, &mut names, &ResolverConfig::default());

        assert!(names.is_empty());
    }

    #[test]
    fn test_already_used_name_rejected() {
        let segments = vec![segment("SPEAKER_01", "this is Asha")];
        let mut names = SpeakerNameMap::new();
        names.insert("SPEAKER_00".to_string(), "Asha".to_string());

        detect_contextual_names(&segments, &mut names, &ResolverConfig::default());

        assert!(names.get("SPEAKER_01").is_none());
    }

    #[test]
    fn test_resolved_label_skipped() {
        let segments = vec![segment("SPEAKER_00", "I am Harshana from billing")];
        let mut names = SpeakerNameMap::new();
        names.insert("SPEAKER_00".to_string(), "Priya".to_string());

        detect_contextual_names(&segments, &mut names, &ResolverConfig::default());

        assert_eq!(names.get("SPEAKER_00").map(String::as_str), Some("Priya"));
    }
}
