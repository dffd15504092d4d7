use regex::Regex;

use super::ResolverConfig;

/// Find a vocative address in utterance text: a direct naming of the
/// addressee, as in "Rahul, I wanted to know...".
///
/// Returns the addressed name when it passes the exclusion list and length
/// check. This is the last-resort recovery for labels the introduction and
/// context passes could not resolve, and the local replacement for generic
/// placeholder names returned by the enrichment collaborator.
pub fn find_vocative_name(text: &str, config: &ResolverConfig) -> Option<String> {
    let pattern =
        Regex::new(r"\b([A-Z][a-z]+),\s+(?:I|just|we|you)\b").expect("vocative pattern compiles");

    for caps in pattern.captures_iter(text) {
        let name = caps.get(1)?.as_str();
        if name.len() >= config.min_name_chars
            && !config.address_stop_words.iter().any(|w| w == name)
        {
            return Some(name.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocative_address_found() {
        let config = ResolverConfig::default();
        assert_eq!(
            find_vocative_name("Rahul, I wanted to know if you're available", &config),
            Some("Rahul".to_string())
        );
    }

    #[test]
    fn test_vocative_requires_following_word() {
        let config = ResolverConfig::default();
        assert_eq!(find_vocative_name("Thanks Rahul, see you later", &config), None);
    }

    #[test]
    fn test_excluded_word_skipped() {
        let config = ResolverConfig::default();
        // "Okay, I..." matches the shape but is on the exclusion list.
        assert_eq!(find_vocative_name("Okay, I will check", &config), None);
    }

    #[test]
    fn test_excluded_then_real_name() {
        let config = ResolverConfig::default();
        assert_eq!(
            find_vocative_name("Okay, I see. Meera, you were saying?", &config),
            Some("Meera".to_string())
        );
    }

    #[test]
    fn test_short_name_rejected() {
        let config = ResolverConfig::default();
        assert_eq!(find_vocative_name("Al, I need the report", &config), None);
    }
}
