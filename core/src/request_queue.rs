use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::server::SearchServer;
use crate::DocId;
use std::collections::VecDeque;

/// Requests kept in the window by default: one per minute over a day.
pub const MIN_IN_DAY: usize = 1440;

/// Wraps a server and counts how many of the last `window` requests found nothing.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    /// One flag per request in the window, true when the result was empty.
    requests: VecDeque<bool>,
    window: usize,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self::with_window(server, MIN_IN_DAY)
    }

    /// A zero window is bumped to one.
    pub fn with_window(server: &'a SearchServer, window: usize) -> Self {
        let window = window.max(1);
        Self { server, requests: VecDeque::with_capacity(window), window, no_result_requests: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let found = self.server.find_top_documents(raw_query)?;
        Ok(self.record_result(found))
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        let found = self.server.find_top_documents_by_status(raw_query, status)?;
        Ok(self.record_result(found))
    }

    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let found = self.server.find_top_documents_by(raw_query, predicate)?;
        Ok(self.record_result(found))
    }

    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    /// Count a result computed outside the queue, such as one entry of a batch run.
    pub fn record_result(&mut self, found: Vec<Document>) -> Vec<Document> {
        if self.requests.len() == self.window && self.requests.pop_front() == Some(true) {
            self.no_result_requests -= 1;
        }
        let empty = found.is_empty();
        self.requests.push_back(empty);
        if empty {
            self.no_result_requests += 1;
        }
        found
    }
}
