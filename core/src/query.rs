use crate::error::{Result, SearchError};
use crate::stop_words::StopWords;
use crate::tokenizer::{is_valid_word, split_into_words};

/// Parsed query. Words borrow from the raw query text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

impl Query<'_> {
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'q>(text: &'q str, stop_words: &StopWords) -> Result<QueryWord<'q>> {
    if text.is_empty() {
        return Err(SearchError::InvalidWord(text.to_string()));
    }
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    // Only one level of minus: "--x" is rejected, as is a bare "-".
    if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
        return Err(SearchError::InvalidWord(text.to_string()));
    }
    Ok(QueryWord { data, is_minus, is_stop: stop_words.is_stop_word(data) })
}

/// Parse `text` into plus and minus words, dropping stop words.
///
/// With `dedup` both lists come back sorted and free of duplicates; without
/// it they keep query order.
pub fn parse_query<'q>(text: &'q str, stop_words: &StopWords, dedup: bool) -> Result<Query<'q>> {
    let mut query = Query::default();
    for word in split_into_words(text) {
        let word = parse_query_word(word, stop_words)?;
        if word.is_stop {
            continue;
        }
        if word.is_minus {
            query.minus_words.push(word.data);
        } else {
            query.plus_words.push(word.data);
        }
    }
    if dedup {
        remove_duplicate_words(&mut query.plus_words);
        remove_duplicate_words(&mut query.minus_words);
    }
    Ok(query)
}

pub fn remove_duplicate_words(words: &mut Vec<&str>) {
    words.sort_unstable();
    words.dedup();
}
