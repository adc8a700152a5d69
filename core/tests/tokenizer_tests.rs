use search_core::tokenizer::{is_valid_word, split_into_valid_words, split_into_words};
use search_core::SearchError;

#[test]
fn it_splits_on_spaces_only() {
    let words = split_into_words("  funny,  pet\u{7f}   with-curly hair ");
    assert_eq!(words, vec!["funny,", "pet\u{7f}", "with-curly", "hair"]);
}

#[test]
fn it_keeps_case_and_non_ascii() {
    let words = split_into_words("Cat cat КОТ");
    assert_eq!(words, vec!["Cat", "cat", "КОТ"]);
    assert!(words.iter().all(|w| is_valid_word(w)));
}

#[test]
fn it_rejects_control_characters() {
    assert!(matches!(
        split_into_valid_words("fine\nline"),
        Err(SearchError::InvalidWord(w)) if w == "fine\nline"
    ));
    assert_eq!(split_into_valid_words("").unwrap(), Vec::<&str>::new());
}
