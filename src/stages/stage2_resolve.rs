use std::collections::HashMap;

use tracing::{info, warn};

use crate::heuristics::{
    detect_contextual_names, detect_introductions, find_vocative_name, ResolverConfig,
};
use crate::llm::{AnthropicClient, SegmentAssignment};
use crate::models::{SpeakerNameMap, SpeakerSegment};

/// Execute Stage 2: Speaker resolution
///
/// Maps anonymous speaker labels to human names. Local heuristics run
/// first (introduction patterns, then contextual address patterns); the
/// optional LLM collaborator is consulted only for what they could not
/// resolve, and its output is advisory. A vocative-address scan recovers
/// the last unresolved label. Resolution is idempotent per label: once
/// bound, a name is final for the job and is applied to every segment
/// carrying that label.
pub async fn resolve_speakers(
    segments: &mut [SpeakerSegment],
    enrichment: Option<&AnthropicClient>,
    config: &ResolverConfig,
) -> SpeakerNameMap {
    if segments.is_empty() {
        return SpeakerNameMap::new();
    }

    let mut names = SpeakerNameMap::new();
    detect_introductions(segments, &mut names, config);
    detect_contextual_names(segments, &mut names, config);

    let labels = unique_labels(segments);
    let unresolved = labels.iter().filter(|l| !names.contains_key(*l)).count();

    if let Some(client) = enrichment {
        if labels.len() == 1 {
            info!("Single speaker label; asking enrichment to split the conversation");
            match client.split_transcript(segments).await {
                Ok(assignments) => {
                    apply_split_assignments(segments, &assignments, &mut names, config)
                }
                Err(err) => {
                    warn!("Enrichment split failed; continuing with local heuristics: {err:#}")
                }
            }
        } else if unresolved > 0 {
            info!("{unresolved} labels unresolved; asking enrichment for names");
            match client.resolve_name_map(segments, &labels).await {
                Ok(map) => merge_advisory_names(&map, &labels, segments, &mut names, config),
                Err(err) => {
                    warn!("Enrichment naming failed; continuing with local heuristics: {err:#}")
                }
            }
        }
    }

    recover_unresolved_label(segments, &mut names, config);

    for segment in segments.iter_mut() {
        segment.speaker_name = names.get(&segment.speaker_label).cloned();
    }

    let final_labels = unique_labels(segments);
    info!(
        "Resolved {} of {} speaker labels",
        final_labels
            .iter()
            .filter(|l| names.contains_key(*l))
            .count(),
        final_labels.len()
    );

    names
}

/// Distinct labels in order of first appearance
pub fn unique_labels(segments: &[SpeakerSegment]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for segment in segments {
        if !labels.contains(&segment.speaker_label) {
            labels.push(segment.speaker_label.clone());
        }
    }
    labels
}

/// Whether a name is a generic placeholder rather than a real name
fn is_generic_name(name: &str) -> bool {
    name.starts_with("SPEAKER_") || name.starts_with("Speaker")
}

/// Apply the enrichment split output: segments are relabeled by the
/// model's per-segment speaker assignment, with stable labels handed out
/// in order of first appearance of each distinct name.
///
/// The model output is advisory: generic placeholder names are replaced
/// with a vocative-address name found locally, or dropped so the label
/// falls back to itself.
fn apply_split_assignments(
    segments: &mut [SpeakerSegment],
    assignments: &[SegmentAssignment],
    names: &mut SpeakerNameMap,
    config: &ResolverConfig,
) {
    if assignments.is_empty() {
        return;
    }

    // Stable label per distinct returned name; two-party conversations are
    // the common case, so later names collapse onto the second label.
    let mut label_for_name: HashMap<&str, String> = HashMap::new();
    let mut distinct = 0usize;
    for assignment in assignments {
        if !label_for_name.contains_key(assignment.speaker_name.as_str()) {
            let label = format!("SPEAKER_{:02}", distinct.min(1));
            label_for_name.insert(&assignment.speaker_name, label);
            distinct += 1;
        }
    }

    for assignment in assignments {
        let Some(idx) = assignment.segment_index.checked_sub(1) else {
            continue;
        };
        let Some(segment) = segments.get_mut(idx) else {
            continue;
        };
        segment.speaker_label = label_for_name[assignment.speaker_name.as_str()].clone();
    }

    // The split invalidates bindings keyed to the old single label;
    // rebuild in assignment order so first appearance wins.
    names.clear();
    for assignment in assignments {
        let label = &label_for_name[assignment.speaker_name.as_str()];
        if !is_generic_name(&assignment.speaker_name) && !names.contains_key(label) {
            names.insert(label.clone(), assignment.speaker_name.clone());
        }
    }

    // Replace generic placeholders before acceptance.
    let labels = unique_labels(segments);
    for label in labels {
        if names.contains_key(&label) {
            continue;
        }
        if let Some(name) = vocative_for_label(segments, &label, names, config) {
            info!("Replaced placeholder for {} with \"{}\"", label, name);
            names.insert(label, name);
        }
    }
}

/// Merge an advisory label -> name map for labels the heuristics left
/// unresolved. Generic placeholders go through the vocative replacement;
/// already-claimed names are rejected.
fn merge_advisory_names(
    advisory: &SpeakerNameMap,
    labels: &[String],
    segments: &[SpeakerSegment],
    names: &mut SpeakerNameMap,
    config: &ResolverConfig,
) {
    for label in labels {
        if names.contains_key(label) {
            continue;
        }

        let candidate = match advisory.get(label) {
            Some(name) if !is_generic_name(name) && name != label => name.clone(),
            _ => match vocative_for_label(segments, label, names, config) {
                Some(name) => name,
                None => continue,
            },
        };

        if names.values().any(|used| *used == candidate) {
            continue;
        }
        names.insert(label.clone(), candidate);
    }
}

/// Degenerate-speaker-count recovery: a vocative address names the
/// addressee, so a name found in one party's speech binds to the other,
/// still-unresolved label.
fn recover_unresolved_label(
    segments: &[SpeakerSegment],
    names: &mut SpeakerNameMap,
    config: &ResolverConfig,
) {
    let labels = unique_labels(segments);
    if labels.len() < 2 {
        return;
    }

    let unresolved: Vec<String> = labels
        .iter()
        .filter(|l| !names.contains_key(*l))
        .cloned()
        .collect();
    if unresolved.is_empty() {
        return;
    }

    for segment in segments {
        let Some(name) = find_vocative_name(&segment.text, config) else {
            continue;
        };
        if names.values().any(|used| *used == name) {
            continue;
        }
        if let Some(target) = unresolved.iter().find(|l| **l != segment.speaker_label) {
            info!("Vocative recovery bound {} -> \"{}\"", target, name);
            names.insert(target.clone(), name);
            return;
        }
    }
}

/// Vocative name usable for the given label: found in a segment spoken by
/// the *other* party (the addressee is not the speaker), not yet claimed.
fn vocative_for_label(
    segments: &[SpeakerSegment],
    label: &str,
    names: &SpeakerNameMap,
    config: &ResolverConfig,
) -> Option<String> {
    segments
        .iter()
        .filter(|s| s.speaker_label != label)
        .filter_map(|s| find_vocative_name(&s.text, config))
        .find(|name| !names.values().any(|used| used == name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(label: &str, text: &str, start_ms: u64) -> SpeakerSegment {
        SpeakerSegment {
            speaker_label: label.to_string(),
            speaker_name: None,
            text: text.to_string(),
            start_ms,
            end_ms: start_ms + 1000,
            confidence: 0.9,
        }
    }

    #[tokio::test]
    async fn test_introduction_binds_every_segment_of_label() {
        let mut segments = vec![
            segment("SPEAKER_00", "Hi, I'm Priya, calling about your order", 0),
            segment("SPEAKER_01", "Oh yes, go ahead", 2000),
            segment("SPEAKER_00", "It should arrive on Monday", 4000),
        ];

        let names =
            resolve_speakers(&mut segments, None, &ResolverConfig::default()).await;

        assert_eq!(names.get("SPEAKER_00").map(String::as_str), Some("Priya"));
        assert_eq!(segments[0].speaker_name.as_deref(), Some("Priya"));
        assert_eq!(segments[2].speaker_name.as_deref(), Some("Priya"));
        // Unresolved label falls back to itself at display time.
        assert_eq!(segments[1].speaker_name, None);
        assert_eq!(segments[1].display_name(), "SPEAKER_01");
    }

    #[tokio::test]
    async fn test_vocative_recovery_binds_second_label() {
        let mut segments = vec![
            segment("SPEAKER_00", "Good morning, how can I help", 0),
            segment(
                "SPEAKER_00",
                "Rahul, I wanted to know if you're available",
                2000,
            ),
            segment("SPEAKER_01", "Yes, tomorrow works", 4000),
        ];

        let names =
            resolve_speakers(&mut segments, None, &ResolverConfig::default()).await;

        assert_eq!(names.get("SPEAKER_01").map(String::as_str), Some("Rahul"));
        assert_eq!(segments[2].speaker_name.as_deref(), Some("Rahul"));
    }

    #[tokio::test]
    async fn test_claimed_name_not_rebound() {
        // "Asha" introduces herself on the first label; the second speaker
        // addressing her by name must not claim "Asha" too.
        let mut segments = vec![
            segment("SPEAKER_00", "Hello I am Asha", 0),
            segment("SPEAKER_01", "I am fine thanks Asha", 4300),
        ];

        let names =
            resolve_speakers(&mut segments, None, &ResolverConfig::default()).await;

        assert_eq!(names.get("SPEAKER_00").map(String::as_str), Some("Asha"));
        assert!(names.get("SPEAKER_01").is_none());
        assert_eq!(segments[1].display_name(), "SPEAKER_01");
    }

    #[tokio::test]
    async fn test_empty_segments() {
        let mut segments: Vec<SpeakerSegment> = Vec::new();
        let names =
            resolve_speakers(&mut segments, None, &ResolverConfig::default()).await;
        assert!(names.is_empty());
    }

    #[test]
    fn test_unique_labels_order_of_first_appearance() {
        let segments = vec![
            segment("SPEAKER_01", "b", 0),
            segment("SPEAKER_00", "a", 1000),
            segment("SPEAKER_01", "c", 2000),
        ];
        assert_eq!(unique_labels(&segments), vec!["SPEAKER_01", "SPEAKER_00"]);
    }

    #[test]
    fn test_apply_split_assignments_relabels_and_names() {
        let mut segments = vec![
            segment("SPEAKER_00", "Hello, I am Harshna from support", 0),
            segment("SPEAKER_00", "Hi Harshna, I had a question", 2000),
            segment("SPEAKER_00", "Of course, go ahead", 4000),
        ];
        let assignments = vec![
            SegmentAssignment {
                segment_index: 1,
                speaker_name: "Harshna".to_string(),
                reason: Some("introduces self".to_string()),
            },
            SegmentAssignment {
                segment_index: 2,
                speaker_name: "Archana".to_string(),
                reason: Some("asks question".to_string()),
            },
            SegmentAssignment {
                segment_index: 3,
                speaker_name: "Harshna".to_string(),
                reason: Some("responds".to_string()),
            },
        ];

        let mut names = SpeakerNameMap::new();
        apply_split_assignments(
            &mut segments,
            &assignments,
            &mut names,
            &ResolverConfig::default(),
        );

        assert_eq!(segments[0].speaker_label, "SPEAKER_00");
        assert_eq!(segments[1].speaker_label, "SPEAKER_01");
        assert_eq!(segments[2].speaker_label, "SPEAKER_00");
        assert_eq!(names.get("SPEAKER_00").map(String::as_str), Some("Harshna"));
        assert_eq!(names.get("SPEAKER_01").map(String::as_str), Some("Archana"));
    }

    #[test]
    fn test_apply_split_replaces_generic_placeholder() {
        let mut segments = vec![
            segment("SPEAKER_00", "Hello, how can I help", 0),
            segment("SPEAKER_00", "Rahul, I wanted to check my balance", 2000),
        ];
        let assignments = vec![
            SegmentAssignment {
                segment_index: 1,
                speaker_name: "Speaker A".to_string(),
                reason: None,
            },
            SegmentAssignment {
                segment_index: 2,
                speaker_name: "Speaker B".to_string(),
                reason: None,
            },
        ];

        let mut names = SpeakerNameMap::new();
        apply_split_assignments(
            &mut segments,
            &assignments,
            &mut names,
            &ResolverConfig::default(),
        );

        // The vocative in Speaker B's segment names the addressee: the
        // placeholder for the *other* label is replaced with "Rahul".
        assert_eq!(names.get("SPEAKER_00").map(String::as_str), Some("Rahul"));
        assert!(names.get("SPEAKER_01").is_none());
    }

    #[test]
    fn test_merge_advisory_names_skips_generic_and_claimed() {
        let segments = vec![
            segment("SPEAKER_00", "hello", 0),
            segment("SPEAKER_01", "hi", 1000),
            segment("SPEAKER_02", "hey", 2000),
        ];
        let labels = unique_labels(&segments);

        let mut advisory = SpeakerNameMap::new();
        advisory.insert("SPEAKER_00".to_string(), "Asha".to_string());
        advisory.insert("SPEAKER_01".to_string(), "SPEAKER_01".to_string());
        advisory.insert("SPEAKER_02".to_string(), "Asha".to_string());

        let mut names = SpeakerNameMap::new();
        merge_advisory_names(
            &advisory,
            &labels,
            &segments,
            &mut names,
            &ResolverConfig::default(),
        );

        assert_eq!(names.get("SPEAKER_00").map(String::as_str), Some("Asha"));
        // Self-mapped label stays unresolved; duplicate name rejected.
        assert!(names.get("SPEAKER_01").is_none());
        assert!(names.get("SPEAKER_02").is_none());
    }
}
