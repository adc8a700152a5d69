use crate::server::SearchServer;
use crate::DocId;
use std::collections::BTreeSet;

/// Remove every document whose set of words equals that of a document with a
/// smaller id. Frequencies are ignored, only the word sets are compared.
///
/// Returns the removed ids in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let duplicates: Vec<DocId> = {
        let view: &SearchServer = server;
        let mut seen: BTreeSet<Vec<&str>> = BTreeSet::new();
        view.document_ids()
            .filter(|&id| {
                let words = view
                    .word_frequencies(id)
                    .map(|freqs| freqs.keys().map(String::as_str).collect())
                    .unwrap_or_default();
                !seen.insert(words)
            })
            .collect()
    };

    for &document_id in &duplicates {
        if server.remove_document(document_id).is_ok() {
            tracing::info!(document_id, "found duplicate document");
        }
    }
    duplicates
}
