use crate::document::DocumentStatus;
use crate::DocId;
use std::collections::btree_map::{self, BTreeMap};
use std::iter::Copied;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Per-document metadata. Keys double as the set of live ids, kept ascending.
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    documents: BTreeMap<DocId, DocumentData>,
}

/// Ascending iterator over live document ids.
pub type DocumentIds<'a> = Copied<btree_map::Keys<'a, DocId, DocumentData>>;

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and changes nothing) if `doc_id` is already stored.
    pub fn insert(&mut self, doc_id: DocId, data: DocumentData) -> bool {
        match self.documents.entry(doc_id) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(data);
                true
            }
        }
    }

    pub fn remove(&mut self, doc_id: DocId) -> Option<DocumentData> {
        self.documents.remove(&doc_id)
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocumentData> {
        self.documents.get(&doc_id)
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.documents.contains_key(&doc_id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> DocumentIds<'_> {
        self.documents.keys().copied()
    }
}
