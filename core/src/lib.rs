//! In-memory full-text search core.
//!
//! Documents are split on spaces, stop words are dropped, and each remaining
//! word is indexed with its term frequency in both directions
//! (word → document and document → word). Queries are plain words plus
//! `-minus` words and are ranked by TF-IDF, either on the calling thread or
//! across the rayon pool with a bucket-locked accumulator.
//!
//! ```
//! use search_core::{DocumentStatus, SearchServer};
//!
//! let mut server = SearchServer::new("in the").unwrap();
//! server.add_document(1, "cat in the city", DocumentStatus::Actual, &[4, 5]).unwrap();
//! let found = server.find_top_documents("cat -dog").unwrap();
//! assert_eq!(found[0].id, 1);
//! ```

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod paginator;
pub mod query;
pub mod ranking;
pub mod request_queue;
pub mod server;
pub mod stop_words;
pub mod store;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use config::SearchConfig;
pub use document::{Document, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::*;
pub use ranking::ExecutionMode;
pub use server::SearchServer;
pub use stop_words::StopWords;
