//! TF-IDF ranking over the inverted index.
//!
//! relevance(d) = sum over plus-words w in d of tf(w, d) * ln(N / df(w)),
//! restricted to documents accepted by the caller's predicate and with every
//! document containing a minus-word dropped afterwards.

use crate::concurrent_map::ConcurrentMap;
use crate::config::SearchConfig;
use crate::document::{Document, DocumentStatus};
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::store::DocumentStore;
use crate::DocId;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// How a query is evaluated. Both modes return the same documents; relevance
/// may differ in the last bits because summation order differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Plus- and minus-word loops run on the rayon pool and accumulate into a
    /// [`ConcurrentMap`].
    Parallel,
}

/// ln(total / containing). Callers only ask for words present in the index,
/// so `documents_with_word` is at least 1.
pub fn inverse_document_frequency(total_documents: usize, documents_with_word: usize) -> f64 {
    (total_documents as f64 / documents_with_word as f64).ln()
}

/// Score, sort and truncate.
pub fn top_documents<P>(
    index: &InvertedIndex,
    store: &DocumentStore,
    query: &Query<'_>,
    predicate: &P,
    mode: ExecutionMode,
    config: &SearchConfig,
) -> Vec<Document>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let mut documents = find_all_documents(index, store, query, predicate, mode, config.bucket_count);
    sort_by_relevance(&mut documents, config.relevance_epsilon, mode);
    documents.truncate(config.max_result_document_count);
    documents
}

/// Every document matching the query, in ascending id order, unsorted by relevance.
pub fn find_all_documents<P>(
    index: &InvertedIndex,
    store: &DocumentStore,
    query: &Query<'_>,
    predicate: &P,
    mode: ExecutionMode,
    bucket_count: usize,
) -> Vec<Document>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let relevance = match mode {
        ExecutionMode::Sequential => accumulate_sequential(index, store, query, predicate),
        ExecutionMode::Parallel => accumulate_parallel(index, store, query, predicate, bucket_count),
    };
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| store.get(id).map(|data| Document::new(id, relevance, data.rating)))
        .collect()
}

fn accumulate_sequential<P>(
    index: &InvertedIndex,
    store: &DocumentStore,
    query: &Query<'_>,
    predicate: &P,
) -> BTreeMap<DocId, f64>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool,
{
    let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
    for word in &query.plus_words {
        let Some(docs) = index.documents_with_word(word) else {
            continue;
        };
        let idf = inverse_document_frequency(store.len(), docs.len());
        for (&doc_id, &tf) in docs {
            let Some(data) = store.get(doc_id) else { continue };
            if predicate(doc_id, data.status, data.rating) {
                *relevance.entry(doc_id).or_insert(0.0) += tf * idf;
            }
        }
    }

    for word in &query.minus_words {
        if let Some(docs) = index.documents_with_word(word) {
            for doc_id in docs.keys() {
                relevance.remove(doc_id);
            }
        }
    }
    relevance
}

fn accumulate_parallel<P>(
    index: &InvertedIndex,
    store: &DocumentStore,
    query: &Query<'_>,
    predicate: &P,
    bucket_count: usize,
) -> BTreeMap<DocId, f64>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(bucket_count);
    let total = store.len();

    query.plus_words.par_iter().for_each(|word| {
        let Some(docs) = index.documents_with_word(word) else {
            return;
        };
        let idf = inverse_document_frequency(total, docs.len());
        for (&doc_id, &tf) in docs {
            let Some(data) = store.get(doc_id) else { continue };
            if predicate(doc_id, data.status, data.rating) {
                *relevance.access(doc_id) += tf * idf;
            }
        }
    });

    // for_each joins before returning, so no plus-word writer is left here.
    query.minus_words.par_iter().for_each(|word| {
        if let Some(docs) = index.documents_with_word(word) {
            for &doc_id in docs.keys() {
                relevance.erase(doc_id);
            }
        }
    });

    relevance.into_ordinary_map()
}

/// Relevance descending; documents within `epsilon` of the most relevant
/// document of their run are reordered by rating descending.
///
/// An epsilon comparison is not a total order, so the sort itself uses
/// `total_cmp` and the tie-break is applied per run afterwards. Every run is
/// measured from its first element, so two documents further apart than
/// `epsilon` never share a run.
pub fn sort_by_relevance(documents: &mut [Document], epsilon: f64, mode: ExecutionMode) {
    let by_relevance = |a: &Document, b: &Document| b.relevance.total_cmp(&a.relevance);
    match mode {
        ExecutionMode::Sequential => documents.sort_by(by_relevance),
        ExecutionMode::Parallel => documents.par_sort_by(by_relevance),
    }

    let mut start = 0;
    while start < documents.len() {
        let head = documents[start].relevance;
        let mut end = start + 1;
        while end < documents.len() && head - documents[end].relevance < epsilon {
            end += 1;
        }
        if end - start > 1 {
            documents[start..end].sort_by(|a, b| b.rating.cmp(&a.rating));
        }
        start = end;
    }
}
