use crate::models::SpeakerSegment;

/// System prompt for the conversation-split request (single-label transcripts)
pub const SPLIT_SYSTEM_PROMPT: &str = r#"You are an expert at analyzing conversations in any language. You identify speaker changes based on conversation flow, introductions, questions and answers, and context. Return only a valid JSON array, no additional text."#;

/// System prompt for the name-map request (labels already separated)
pub const NAME_MAP_SYSTEM_PROMPT: &str = r#"You are an expert at analyzing conversations in any language and identifying the people speaking. Return only a valid JSON object, no additional text."#;

/// Build the user prompt asking the model to re-derive turn boundaries and
/// name each segment of a transcript that carries a single speaker label.
pub fn build_split_prompt(segments: &[SpeakerSegment]) -> String {
    let mut prompt = String::new();

    prompt.push_str("Analyze this conversation transcript and identify where different speakers are talking.\n\n");
    prompt.push_str("Transcript:\n");
    for (idx, segment) in segments.iter().enumerate() {
        prompt.push_str(&format!("[{}] {}\n", idx + 1, segment.text));
    }

    prompt.push_str(
        r#"
Instructions:
1. Identify where speaker changes occur from the conversation flow.
2. Determine each speaker's actual name from self-introductions ("my name is X", "I am X"), direct address ("X, I wanted to know"), and any other names mentioned.
3. Return a JSON array where each object has:
   - "segmentIndex": the segment number (1-based, matching the transcript)
   - "speakerName": the speaker's actual name, or "Speaker A"/"Speaker B" only if no name appears anywhere in the conversation
   - "reason": brief reason (e.g., "introduces self", "responds to question")

Important:
- If a name is mentioned anywhere in the conversation you MUST use that name, never a generic label.
- Be consistent: once you identify a name, use it for every segment by that speaker.

Return only the JSON array:"#,
    );

    prompt
}

/// Build the user prompt asking the model to map existing speaker labels to
/// actual names.
pub fn build_name_map_prompt(segments: &[SpeakerSegment], labels: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str("Analyze this conversation transcript and identify each speaker's actual name.\n\n");
    prompt.push_str("Transcript:\n");
    for (idx, segment) in segments.iter().enumerate() {
        prompt.push_str(&format!(
            "[Segment {}] {}: {}\n",
            idx + 1,
            segment.speaker_label,
            segment.text
        ));
    }

    prompt.push_str(&format!("\nSpeaker labels found: {}\n", labels.join(", ")));
    prompt.push_str(
        r#"
Instructions:
1. Identify the actual name of each speaker from introductions, direct address, or context.
2. Return a JSON object mapping each speaker label to the speaker's actual name.
3. If a name cannot be determined, map the label to itself.

Example output format:
{
  "SPEAKER_00": "Harshna",
  "SPEAKER_01": "Archana"
}

Return only the JSON object:"#,
    );

    prompt
}
