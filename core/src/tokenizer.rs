use crate::error::{Result, SearchError};

/// Split text into words on single spaces.
///
/// Runs of spaces collapse and leading/trailing spaces are ignored. The
/// returned slices borrow from `text`; no word is copied.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// A word is valid when it holds no control characters (bytes below 0x20).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Split text and reject the whole input if any word is invalid.
pub fn split_into_valid_words(text: &str) -> Result<Vec<&str>> {
    let words = split_into_words(text);
    if let Some(bad) = words.iter().find(|w| !is_valid_word(w)) {
        return Err(SearchError::InvalidWord((*bad).to_string()));
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_trims_spaces() {
        assert_eq!(split_into_words("  cat   in the  city "), vec!["cat", "in", "the", "city"]);
    }

    #[test]
    fn empty_and_blank_text() {
        assert!(split_into_words("").is_empty());
        assert!(split_into_words("    ").is_empty());
    }

    #[test]
    fn words_borrow_from_input() {
        let text = String::from("blue cat");
        let words = split_into_words(&text);
        assert_eq!(words[1].as_ptr(), text[5..].as_ptr());
    }

    #[test]
    fn control_characters_are_invalid() {
        assert!(is_valid_word("cat"));
        assert!(is_valid_word("кот"));
        assert!(!is_valid_word("ca\x12t"));
        assert!(!is_valid_word("tab\there"));
        assert_eq!(
            split_into_valid_words("good b\x01ad"),
            Err(SearchError::InvalidWord("b\x01ad".into()))
        );
    }
}
