//! Guess matching for `/marry`.

/// Whether a guess contains characters that are never accepted.
pub fn has_forbidden_chars(guess: &str) -> bool {
    guess.contains("()") || guess.contains('&')
}

/// Case-insensitive name match.
///
/// Accepts the full name in any word order, any single name part, a
/// prefix of a part (3+ chars), or a substring of a part covering at least
/// 70% of it (4+ chars).
pub fn name_matches(guess: &str, name: &str) -> bool {
    let guess = guess.trim().to_lowercase();
    if guess.is_empty() {
        return false;
    }
    let name = name.to_lowercase();

    let mut guess_words: Vec<&str> = guess.split_whitespace().collect();
    let mut name_parts: Vec<&str> = name.split_whitespace().collect();
    let guess_len = guess.chars().count();

    for part in &name_parts {
        if *part == guess {
            return true;
        }
        if guess_len >= 3 && part.starts_with(guess.as_str()) {
            return true;
        }
        if guess_len >= 4
            && part.contains(guess.as_str())
            && guess_len as f64 >= 0.7 * part.chars().count() as f64
        {
            return true;
        }
    }

    guess_words.sort_unstable();
    name_parts.sort_unstable();
    guess_words == name_parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_any_order() {
        assert!(name_matches("Rem", "Rem"));
        assert!(name_matches("subaru natsuki", "Natsuki Subaru"));
        assert!(name_matches("NATSUKI SUBARU", "Natsuki Subaru"));
    }

    #[test]
    fn test_single_part() {
        assert!(name_matches("subaru", "Natsuki Subaru"));
        assert!(!name_matches("ram", "Natsuki Subaru"));
    }

    #[test]
    fn test_prefix_needs_three_chars() {
        assert!(name_matches("nat", "Natsuki Subaru"));
        assert!(!name_matches("na", "Natsuki Subaru"));
    }

    #[test]
    fn test_substring_coverage() {
        // "tsuki" is 5 of 7 chars of "natsuki" (71%)
        assert!(name_matches("tsuki", "Natsuki Subaru"));
        // "suki" is 4 of 7 (57%)
        assert!(!name_matches("suki", "Natsuki Subaru"));
    }

    #[test]
    fn test_empty_and_partial_words() {
        assert!(!name_matches("", "Rem"));
        assert!(!name_matches("   ", "Rem"));
        assert!(!name_matches("natsuki subaru kun", "Natsuki Subaru"));
    }

    #[test]
    fn test_forbidden_chars() {
        assert!(has_forbidden_chars("rem()"));
        assert!(has_forbidden_chars("rem & ram"));
        assert!(!has_forbidden_chars("rem (re zero)"));
    }
}
