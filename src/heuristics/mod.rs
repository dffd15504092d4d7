pub mod context;
pub mod introductions;
pub mod vocative;

pub use context::*;
pub use introductions::*;
pub use vocative::*;

/// Configuration for name resolution heuristics.
///
/// The exclusion lists are injectable rather than inline so tests and
/// deployments can tune them; the defaults come from words observed to
/// false-positive in real call transcripts.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// How many leading segments to scan for self-introductions
    pub intro_scan_segments: usize,
    /// Minimum accepted name length in characters
    pub min_name_chars: usize,
    /// Words that terminate a captured name (pass 1 cleanup), lowercase
    pub trailing_stop_words: Vec<String>,
    /// Common words rejected as contextual name candidates, lowercase
    pub common_words: Vec<String>,
    /// Capitalized words rejected as vocative-address candidates
    pub address_stop_words: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            intro_scan_segments: 20,
            min_name_chars: 3,
            trailing_stop_words: [
                "from", "maam", "ma'am", "sir", "ji", "the", "and", "or", "but", "this", "that",
            ]
            .map(String::from)
            .to_vec(),
            common_words: [
                "yes", "no", "okay", "thank", "hello", "hi", "hey", "maam", "sir", "from", "the",
                "and", "but", "can", "you", "your", "will", "would", "should", "could",
            ]
            .map(String::from)
            .to_vec(),
            address_stop_words: [
                "Yes", "No", "Okay", "Ma", "Am", "Can", "You", "Your", "The", "This", "That",
                "Thank", "Hello", "Good", "Morning", "Evening", "Saturday", "Sunday", "Sector",
                "Street", "Executive", "Customer", "Absolutely", "Approximately",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Whether a token looks like a properly capitalized name word
/// (one uppercase letter followed by lowercase letters).
pub(crate) fn is_capitalized_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let rest = chars.as_str();
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_lowercase())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_capitalized_word() {
        assert!(is_capitalized_word("Priya"));
        assert!(is_capitalized_word("Rahul"));
        assert!(!is_capitalized_word("priya"));
        assert!(!is_capitalized_word("PRIYA"));
        assert!(!is_capitalized_word("P"));
        assert!(!is_capitalized_word("Pri-ya"));
        assert!(!is_capitalized_word(""));
    }
}
