use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words};
use std::collections::BTreeSet;

/// Case-sensitive set of words excluded from indexing and from queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a space-separated string such as `"in the and"`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_words(split_into_words(text))
    }

    /// Build from any collection of words. Empty strings are skipped; a word
    /// with control characters fails the whole construction.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "stop word {word:?} contains control characters"
                )));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Union of this set and the words in `text`. `self` is untouched on error.
    pub fn extend_from_text(&self, text: &str) -> Result<Self> {
        let extra = Self::from_text(text)?;
        let mut words = self.words.clone();
        words.extend(extra.words);
        Ok(Self { words })
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_and_ignores_extra_spaces() {
        let stop = StopWords::from_text("  in the  in ").unwrap();
        assert_eq!(stop.len(), 2);
        assert!(stop.is_stop_word("in"));
        assert!(stop.is_stop_word("the"));
        assert!(!stop.is_stop_word("cat"));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let stop = StopWords::from_text("The").unwrap();
        assert!(stop.is_stop_word("The"));
        assert!(!stop.is_stop_word("the"));
    }

    #[test]
    fn collection_skips_empty_strings() {
        let stop = StopWords::from_words(vec!["", "and", ""]).unwrap();
        assert_eq!(stop.iter().collect::<Vec<_>>(), vec!["and"]);
    }

    #[test]
    fn invalid_word_fails_construction() {
        let err = StopWords::from_words(["ok", "b\x07d"]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn extend_keeps_original_on_error() {
        let stop = StopWords::from_text("in").unwrap();
        assert!(stop.extend_from_text("the \x1f").is_err());
        let wider = stop.extend_from_text("the").unwrap();
        assert_eq!(wider.len(), 2);
        assert_eq!(stop.len(), 1);
    }
}
