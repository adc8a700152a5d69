use rayon::prelude::*;
use std::collections::BTreeMap;

pub type DocId = i32;

/// Term frequencies of one document, keyed by word.
pub type WordFreqs = BTreeMap<String, f64>;
/// Term frequencies of one word, keyed by document.
pub type DocFreqs = BTreeMap<DocId, f64>;

/// Dual-direction inverted index.
///
/// `word_to_docs` answers ranking lookups, `doc_to_words` answers removal and
/// word-frequency lookups. Both are only mutated through `insert_document` and
/// `remove_document`, which keep them mirror images of each other. A word with
/// no documents left is pruned, so a present word always has at least one doc.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InvertedIndex {
    word_to_docs: BTreeMap<String, DocFreqs>,
    doc_to_words: BTreeMap<DocId, WordFreqs>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `words` (already validated and stop-word filtered) under `doc_id`.
    ///
    /// Each occurrence adds `1 / words.len()` to the pair's frequency. A
    /// document with no words still gets an (empty) reverse entry.
    pub fn insert_document(&mut self, doc_id: DocId, words: &[&str]) {
        let freqs = self.doc_to_words.entry(doc_id).or_default();
        if words.is_empty() {
            return;
        }
        let inv_word_count = 1.0 / words.len() as f64;
        for &word in words {
            *freqs.entry(word.to_string()).or_insert(0.0) += inv_word_count;
            *self
                .word_to_docs
                .entry(word.to_string())
                .or_default()
                .entry(doc_id)
                .or_insert(0.0) += inv_word_count;
        }
    }

    /// Drop every trace of `doc_id`, returning its word frequencies.
    pub fn remove_document(&mut self, doc_id: DocId) -> Option<WordFreqs> {
        let freqs = self.doc_to_words.remove(&doc_id)?;
        for word in freqs.keys() {
            if let Some(docs) = self.word_to_docs.get_mut(word) {
                docs.remove(&doc_id);
                if docs.is_empty() {
                    self.word_to_docs.remove(word);
                }
            }
        }
        Some(freqs)
    }

    /// Same as [`remove_document`](Self::remove_document), but the per-word
    /// postings are updated on the rayon pool.
    pub fn remove_document_par(&mut self, doc_id: DocId) -> Option<WordFreqs> {
        let freqs = self.doc_to_words.remove(&doc_id)?;
        self.word_to_docs
            .par_iter_mut()
            .filter(|(word, _)| freqs.contains_key(word.as_str()))
            .for_each(|(_, docs)| {
                docs.remove(&doc_id);
            });
        self.word_to_docs.retain(|_, docs| !docs.is_empty());
        Some(freqs)
    }

    pub fn word_frequencies(&self, doc_id: DocId) -> Option<&WordFreqs> {
        self.doc_to_words.get(&doc_id)
    }

    /// Documents containing `word` with their term frequency.
    pub fn documents_with_word(&self, word: &str) -> Option<&DocFreqs> {
        self.word_to_docs.get(word).filter(|docs| !docs.is_empty())
    }

    /// The index's own copy of `word`, if `doc_id` contains it.
    pub fn word_in_document(&self, word: &str, doc_id: DocId) -> Option<&str> {
        let (key, docs) = self.word_to_docs.get_key_value(word)?;
        docs.contains_key(&doc_id).then_some(key.as_str())
    }

    pub fn contains(&self, word: &str, doc_id: DocId) -> bool {
        self.word_in_document(word, doc_id).is_some()
    }

    /// Number of distinct indexed words.
    pub fn word_count(&self) -> usize {
        self.word_to_docs.len()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.word_to_docs.keys().map(String::as_str)
    }
}
