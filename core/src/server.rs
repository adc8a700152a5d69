use crate::config::SearchConfig;
use crate::document::{compute_average_rating, Document, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::{InvertedIndex, WordFreqs};
use crate::query::{parse_query, remove_duplicate_words};
use crate::ranking::{top_documents, ExecutionMode};
use crate::stop_words::StopWords;
use crate::store::{DocumentData, DocumentIds, DocumentStore};
use crate::tokenizer::split_into_valid_words;
use crate::DocId;
use rayon::prelude::*;

/// In-memory search server: owns the stop words, the inverted index and the
/// document store, and keeps them consistent.
///
/// Mutations take `&mut self`, queries take `&self`, so a query can never
/// observe a half-applied add or remove.
#[derive(Debug, Default, Clone)]
pub struct SearchServer {
    config: SearchConfig,
    stop_words: StopWords,
    index: InvertedIndex,
    documents: DocumentStore,
}

impl SearchServer {
    /// Server with default configuration and stop words from a space-separated string.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Ok(Self::with_config(SearchConfig::default(), StopWords::from_text(stop_words_text)?))
    }

    pub fn with_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_config(SearchConfig::default(), StopWords::from_words(stop_words)?))
    }

    pub fn with_config(config: SearchConfig, stop_words: StopWords) -> Self {
        Self { config, stop_words, ..Self::default() }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Add more stop words. Already indexed documents keep their words;
    /// the new words are ignored in later documents and in every query.
    pub fn set_stop_words(&mut self, text: &str) -> Result<()> {
        self.stop_words = self.stop_words.extend_from_text(text)?;
        Ok(())
    }

    pub fn add_document(
        &mut self,
        document_id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 {
            return Err(SearchError::InvalidArgument(format!("negative document id {document_id}")));
        }
        if self.documents.contains(document_id) {
            return Err(SearchError::InvalidArgument(format!("document id {document_id} already exists")));
        }
        let words = self.split_into_words_no_stop(text)?;

        // Nothing below can fail.
        self.index.insert_document(document_id, &words);
        self.documents.insert(document_id, DocumentData { rating: compute_average_rating(ratings), status });
        tracing::debug!(document_id, words = words.len(), "document added");
        Ok(())
    }

    /// Remove a live document. An unknown id is an error and changes nothing.
    pub fn remove_document(&mut self, document_id: DocId) -> Result<()> {
        self.remove_document_with_mode(ExecutionMode::Sequential, document_id)
    }

    pub fn remove_document_with_mode(&mut self, mode: ExecutionMode, document_id: DocId) -> Result<()> {
        if self.documents.remove(document_id).is_none() {
            return Err(SearchError::InvalidArgument(format!("document id {document_id} is not indexed")));
        }
        let removed = match mode {
            ExecutionMode::Sequential => self.index.remove_document(document_id),
            ExecutionMode::Parallel => self.index.remove_document_par(document_id),
        };
        let words = removed.map_or(0, |freqs| freqs.len());
        tracing::debug!(document_id, words, ?mode, "document removed");
        Ok(())
    }

    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, move |_, document_status, _| document_status == status)
    }

    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with_mode(ExecutionMode::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_with_mode<P>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words, true)?;
        let found = top_documents(&self.index, &self.documents, &query, &predicate, mode, &self.config);
        tracing::trace!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            found = found.len(),
            ?mode,
            "query ranked"
        );
        Ok(found)
    }

    /// Plus-words of `raw_query` present in the document, sorted and unique,
    /// or nothing if any minus-word is present.
    pub fn match_document(&self, raw_query: &str, document_id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        self.match_document_with_mode(ExecutionMode::Sequential, raw_query, document_id)
    }

    pub fn match_document_with_mode(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        document_id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        let status = self.documents.get(document_id).ok_or(SearchError::OutOfRange(document_id))?.status;
        let index = &self.index;

        let matched = match mode {
            ExecutionMode::Sequential => {
                let query = parse_query(raw_query, &self.stop_words, true)?;
                if query.minus_words.iter().any(|w| index.contains(w, document_id)) {
                    Vec::new()
                } else {
                    query.plus_words.iter().filter_map(|w| index.word_in_document(w, document_id)).collect()
                }
            }
            ExecutionMode::Parallel => {
                let query = parse_query(raw_query, &self.stop_words, false)?;
                if query.minus_words.par_iter().any(|w| index.contains(w, document_id)) {
                    Vec::new()
                } else {
                    let mut words: Vec<&str> =
                        query.plus_words.par_iter().filter_map(|w| index.word_in_document(w, document_id)).collect();
                    remove_duplicate_words(&mut words);
                    words
                }
            }
        };
        Ok((matched, status))
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Word → term frequency for one document; empty for a document with no indexed words.
    pub fn word_frequencies(&self, document_id: DocId) -> Result<&WordFreqs> {
        self.index.word_frequencies(document_id).ok_or(SearchError::OutOfRange(document_id))
    }

    /// Live ids in ascending order.
    pub fn document_ids(&self) -> DocumentIds<'_> {
        self.documents.ids()
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let words = split_into_valid_words(text)?;
        Ok(words.into_iter().filter(|w| !self.stop_words.is_stop_word(w)).collect())
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_add_leaves_index_untouched() {
        let mut server = SearchServer::new("").unwrap();
        server.add_document(1, "cat city", DocumentStatus::Actual, &[1]).unwrap();
        let err = server.add_document(2, "dog b\x03d", DocumentStatus::Actual, &[1]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidWord(_)));
        assert_eq!(server.document_count(), 1);
        assert!(server.word_frequencies(2).is_err());
        assert!(server.find_top_documents("dog").unwrap().is_empty());
    }

    #[test]
    fn document_of_only_stop_words_is_live_but_unmatched() {
        let mut server = SearchServer::new("in the").unwrap();
        server.add_document(0, "in the", DocumentStatus::Actual, &[]).unwrap();
        assert_eq!(server.document_count(), 1);
        assert!(server.word_frequencies(0).unwrap().is_empty());
        assert!(server.find_top_documents("in the").unwrap().is_empty());
    }

    #[test]
    fn set_stop_words_applies_to_later_documents_and_queries() {
        let mut server = SearchServer::new("").unwrap();
        server.add_document(1, "cat in city", DocumentStatus::Actual, &[]).unwrap();
        server.set_stop_words("in").unwrap();
        server.add_document(2, "dog in park", DocumentStatus::Actual, &[]).unwrap();
        assert!(server.word_frequencies(1).unwrap().contains_key("in"));
        assert!(!server.word_frequencies(2).unwrap().contains_key("in"));
        assert!(server.find_top_documents("in").unwrap().is_empty());
        assert!(server.set_stop_words("bad\x01").is_err());
        assert_eq!(server.stop_words().len(), 1);
    }

    #[test]
    fn parallel_removal_matches_sequential() {
        let mut seq = SearchServer::new("").unwrap();
        seq.add_document(1, "cat city", DocumentStatus::Actual, &[1]).unwrap();
        seq.add_document(2, "cat tree tree", DocumentStatus::Actual, &[2]).unwrap();
        seq.add_document(3, "dog park", DocumentStatus::Actual, &[3]).unwrap();
        let mut par = seq.clone();

        seq.remove_document_with_mode(ExecutionMode::Sequential, 2).unwrap();
        par.remove_document_with_mode(ExecutionMode::Parallel, 2).unwrap();
        assert_eq!(seq.index, par.index);
        assert!(par.find_top_documents("tree").unwrap().is_empty());
        assert_eq!(par.find_top_documents("cat").unwrap().len(), 1);
        assert!(matches!(
            par.remove_document_with_mode(ExecutionMode::Parallel, 2),
            Err(SearchError::InvalidArgument(_))
        ));
        assert_eq!(par.document_count(), 2);
    }

    #[test]
    fn iteration_is_ascending() {
        let mut server = SearchServer::new("").unwrap();
        for id in [9, 0, 4] {
            server.add_document(id, "x", DocumentStatus::Actual, &[]).unwrap();
        }
        let ids: Vec<DocId> = (&server).into_iter().collect();
        assert_eq!(ids, vec![0, 4, 9]);
    }
}
