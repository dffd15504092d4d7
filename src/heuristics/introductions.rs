use regex::Regex;
use tracing::debug;

use crate::models::{SpeakerSegment, SpeakerNameMap};

use super::{is_capitalized_word, ResolverConfig};

/// Candidate name: one or two properly capitalized words
const NAME: &str = r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)";

/// Ordered self-introduction patterns, evaluated first-match-wins.
///
/// The phrase part is case-insensitive; the captured name is not, so only
/// properly capitalized tokens are considered.
fn intro_patterns() -> Vec<Regex> {
    [
        format!(r"(?i:my\s+name\s+is)\s+{NAME}"),
        format!(r"(?:^|[\s,.])(?i:i'?m|i\s+am|im)\s+{NAME}"),
        format!(r"(?i:this\s+is)\s+{NAME}"),
        format!(r"(?i:(?:you\s+can\s+)?call\s+me)\s+{NAME}"),
        format!(r"(?i:(?:hi|hello|hey)[,\s]+(?:i'?m|i\s+am|im|this\s+is))\s+{NAME}"),
        format!(r"(?i:(?:speaking|here)[,\s]+(?:this\s+is|i'?m|i\s+am|im))\s+{NAME}"),
        format!(r"(?i:(?:the\s+)?name'?s)\s+{NAME}"),
        format!(r"(?i:(?:you'?re\s+)?(?:speaking\s+with|talking\s+to))\s+{NAME}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("introduction pattern compiles"))
    .collect()
}

/// Pass 1: bind labels to names from self-introductions.
///
/// Scans the first `intro_scan_segments` segments in chronological order.
/// A name already bound to another label is never reused.
pub fn detect_introductions(
    segments: &[SpeakerSegment],
    names: &mut SpeakerNameMap,
    config: &ResolverConfig,
) {
    let patterns = intro_patterns();

    for segment in segments.iter().take(config.intro_scan_segments) {
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

            let Some(name) = clean_candidate(candidate, config) else {
                continue;
            };

            if names.values().any(|used| *used == name) {
                continue;
            }

            debug!(
                "Introduction bound {} -> \"{}\" from: \"{}\"",
                segment.speaker_label,
                name,
                segment.text.chars().take(50).collect::<String>()
            );
            names.insert(segment.speaker_label.clone(), name);
            break;
        }
    }
}

/// Keep the leading run of capitalized word-tokens, stopping at the first
/// trailing stop-word or improperly formatted token. Returns None when the
/// remainder is too short to be a name.
fn clean_candidate(candidate: &str, config: &ResolverConfig) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();

    for part in candidate.split_whitespace() {
        if config
            .trailing_stop_words
            .iter()
            .any(|stop| stop.eq_ignore_ascii_case(part))
        {
            break;
        }
        if !is_capitalized_word(part) {
            break;
        }
        parts.push(part);
    }

    let name = parts.join(" ");
    (name.len() >= config.min_name_chars).then_some(name)
}
