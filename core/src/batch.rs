use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::ranking::ExecutionMode;
use crate::server::SearchServer;
use rayon::prelude::*;

/// Run `find_top_documents` for every query, keeping query order.
///
/// The first failing query fails the whole batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S], mode: ExecutionMode) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    process_queries_by_status(server, queries, DocumentStatus::Actual, mode)
}

/// Like [`process_queries`], ranking only documents with `status`.
pub fn process_queries_by_status<S>(
    server: &SearchServer,
    queries: &[S],
    status: DocumentStatus,
    mode: ExecutionMode,
) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    let run = |q: &S| server.find_top_documents_by_status(q.as_ref(), status);
    match mode {
        ExecutionMode::Sequential => queries.iter().map(run).collect(),
        ExecutionMode::Parallel => queries.par_iter().map(run).collect(),
    }
}

/// Like [`process_queries`], flattened into one sequence.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S], mode: ExecutionMode) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries, mode)?.into_iter().flatten().collect())
}
