use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

pub const BLANK: &str = "_______";

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Case-insensitive matcher for `word`, optionally anchored on word boundaries
pub fn word_pattern(word: &str, boundaries: bool) -> Option<Regex> {
    let escaped = regex::escape(word.trim());
    if escaped.is_empty() {
        return None;
    }
    let pattern = if boundaries {
        format!(r"\b{}\b", escaped)
    } else {
        escaped
    };
    RegexBuilder::new(&pattern).case_insensitive(true).build().ok()
}

/// Replaces every occurrence of `word` with a blank; `None` when nothing was replaced
pub fn blank_out(sentence: &str, word: &str) -> Option<String> {
    let re = word_pattern(word, false)?;
    if !re.is_match(sentence) {
        return None;
    }
    Some(re.replace_all(sentence, BLANK).into_owned())
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_out_is_case_insensitive() {
        assert_eq!(
            blank_out("Apple pie is better than an apple.", "apple").as_deref(),
            Some("_______ pie is better than an _______.")
        );
    }

    #[test]
    fn test_blank_out_missing_word() {
        assert_eq!(blank_out("The cat sleeps.", "dog"), None);
        assert_eq!(blank_out("The cat sleeps.", "  "), None);
    }

    #[test]
    fn test_word_pattern_boundaries() {
        let re = word_pattern("cat", true).unwrap();
        assert!(re.is_match("A Cat sat."));
        assert!(!re.is_match("Concatenate it."));

        let loose = word_pattern("cat", false).unwrap();
        assert!(loose.is_match("Concatenate it."));
    }

    #[test]
    fn test_word_pattern_escapes_metacharacters() {
        let re = word_pattern("c++", false).unwrap();
        assert!(re.is_match("I write C++ daily"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  What is\n  the   word? "), "What is the word?");
    }
}
