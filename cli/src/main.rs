use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::batch::{process_queries, process_queries_by_status, process_queries_joined};
use search_core::dedup::remove_duplicates;
use search_core::paginator::paginate;
use search_core::request_queue::RequestQueue;
use search_core::{DocId, Document, DocumentStatus, ExecutionMode, SearchConfig, SearchServer, StopWords};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "search-server")]
#[command(about = "Rank documents with TF-IDF plus/minus-word queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Input path (a .json/.jsonl file or a directory of them)
    #[arg(long)]
    input: String,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// JSON file with ranking configuration
    #[arg(long)]
    config: Option<String>,
    /// Results returned per query (overrides the config file)
    #[arg(long)]
    max_results: Option<usize>,
    /// Buckets in the parallel relevance accumulator (overrides the config file)
    #[arg(long)]
    buckets: Option<usize>,
    /// Remove documents whose set of words repeats an earlier document
    #[arg(long, default_value_t = false)]
    dedup: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run queries one by one and report how many found nothing
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Query, repeatable
        #[arg(long = "query", required = true, allow_hyphen_values = true)]
        queries: Vec<String>,
        /// Only rank documents with this status
        #[arg(long, default_value = "actual")]
        status: DocumentStatus,
        /// Results per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        /// Rank the queries on the rayon pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Print the results as JSON instead of pages
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run a batch of queries, optionally in parallel and flattened
    Batch {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long = "query", required = true, allow_hyphen_values = true)]
        queries: Vec<String>,
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Print one combined result list instead of one per query
        #[arg(long, default_value_t = false)]
        joined: bool,
    },
    /// Show which query words a document contains
    Match {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long, allow_hyphen_values = true)]
        query: String,
        #[arg(long)]
        id: DocId,
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Print document count and per-document word frequencies
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, queries, status, page_size, parallel, json } => {
            let server = load_server(&corpus)?;
            let output = SearchOutput { page_size, json };
            run_search(&server, &queries, status, execution_mode(parallel), output)
        }
        Commands::Batch { corpus, queries, parallel, joined } => {
            let server = load_server(&corpus)?;
            let mode = execution_mode(parallel);
            if joined {
                let documents = process_queries_joined(&server, queries.as_slice(), mode)?;
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else {
                let documents = process_queries(&server, queries.as_slice(), mode)?;
                println!("{}", serde_json::to_string_pretty(&documents)?);
            }
            Ok(())
        }
        Commands::Match { corpus, query, id, parallel } => {
            let server = load_server(&corpus)?;
            let (words, status) = server.match_document_with_mode(execution_mode(parallel), &query, id)?;
            println!("{{ document_id = {id}, status = {status}, words = {} }}", words.join(" "));
            Ok(())
        }
        Commands::Stats { corpus } => {
            let server = load_server(&corpus)?;
            println!("documents: {}", server.document_count());
            for id in &server {
                let freqs = server.word_frequencies(id)?;
                println!("{id}: {}", serde_json::to_string(freqs)?);
            }
            Ok(())
        }
    }
}

fn execution_mode(parallel: bool) -> ExecutionMode {
    if parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    }
}

#[derive(Debug, Clone, Copy)]
struct SearchOutput {
    page_size: usize,
    json: bool,
}

fn run_search(
    server: &SearchServer,
    queries: &[String],
    status: DocumentStatus,
    mode: ExecutionMode,
    output: SearchOutput,
) -> Result<()> {
    let results = process_queries_by_status(server, queries, status, mode)?;
    let mut queue = RequestQueue::new(server);
    let results: Vec<Vec<Document>> = results.into_iter().map(|found| queue.record_result(found)).collect();

    if output.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (query, documents) in queries.iter().zip(&results) {
            println!("query: {query}");
            for (n, page) in paginate(documents.as_slice(), output.page_size)?.into_iter().enumerate() {
                println!("  page {}: {page}", n + 1);
            }
        }
    }
    println!("requests without results: {}", queue.no_result_requests());
    Ok(())
}

fn load_config(corpus: &CorpusArgs) -> Result<SearchConfig> {
    let mut config = match &corpus.config {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("open config {path}"))?;
            serde_json::from_reader(BufReader::new(f))?
        }
        None => SearchConfig::default(),
    };
    if let Some(max_results) = corpus.max_results {
        config.max_result_document_count = max_results;
    }
    if let Some(buckets) = corpus.buckets {
        config.bucket_count = buckets;
    }
    Ok(config)
}

fn load_server(corpus: &CorpusArgs) -> Result<SearchServer> {
    let config = load_config(corpus)?;
    let stop_words = StopWords::from_text(&corpus.stop_words)?;
    let mut server = SearchServer::with_config(config, stop_words);

    let docs = read_documents(Path::new(&corpus.input))?;
    for doc in docs {
        server
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("add document {}", doc.id))?;
    }
    tracing::info!(num_docs = server.document_count(), input = %corpus.input, "documents loaded");

    if corpus.dedup {
        let removed = remove_duplicates(&mut server);
        tracing::info!(removed = removed.len(), "duplicates removed");
    }
    Ok(server)
}

fn read_documents(input_path: &Path) -> Result<Vec<InputDoc>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("input {} does not exist", input_path.display());
    }

    let mut docs = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }
    Ok(docs)
}

fn read_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc =
            serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "skipping json that is neither object nor array"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn corpus_args(input: &Path) -> CorpusArgs {
        CorpusArgs {
            input: input.to_string_lossy().to_string(),
            stop_words: "in the".into(),
            config: None,
            max_results: None,
            buckets: None,
            dedup: false,
        }
    }

    #[test]
    fn loads_json_and_jsonl_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            concat!(
                "{\"id\": 1, \"text\": \"cat in the city\", \"ratings\": [1, 2, 3]}\n\n",
                "{\"id\": 2, \"text\": \"dog\", \"status\": \"banned\"}\n",
            ),
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"id": 3, "text": "cat cat tree"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let server = load_server(&corpus_args(dir.path())).unwrap();
        assert_eq!(server.document_count(), 3);
        let found = server.find_top_documents("cat").unwrap();
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(found[1].rating, 2);
        let banned = server.find_top_documents_by_status("dog", DocumentStatus::Banned).unwrap();
        assert_eq!(banned.len(), 1);
    }

    #[test]
    fn dedup_and_overrides_apply() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("docs.json");
        fs::write(
            &file,
            r#"[{"id": 1, "text": "cat dog"}, {"id": 2, "text": "dog cat cat"}, {"id": 3, "text": "cat bird"}]"#,
        )
        .unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"max_result_document_count": 1}"#).unwrap();

        let mut args = corpus_args(&file);
        args.dedup = true;
        args.config = Some(config.to_string_lossy().to_string());
        args.buckets = Some(7);
        let server = load_server(&args).unwrap();
        assert_eq!(server.document_ids().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(server.config().max_result_document_count, 1);
        assert_eq!(server.config().bucket_count, 7);
        assert_eq!(server.find_top_documents("cat").unwrap().len(), 1);
    }

    #[test]
    fn duplicate_id_in_input_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("docs.jsonl");
        fs::write(&file, "{\"id\": 1, \"text\": \"a\"}\n{\"id\": 1, \"text\": \"b\"}\n").unwrap();
        let err = load_server(&corpus_args(&file)).unwrap_err();
        assert!(err.to_string().contains("add document 1"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_server(&corpus_args(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn cli_parses_repeated_queries() {
        let cli = Cli::try_parse_from([
            "search-server", "search", "--input", "docs.json", "--query", "cat", "--query", "-dog fish",
            "--status", "BANNED",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { queries, status, page_size, parallel, json, .. } => {
                assert_eq!(queries, vec!["cat".to_string(), "-dog fish".to_string()]);
                assert_eq!(status, DocumentStatus::Banned);
                assert_eq!(page_size, 2);
                assert!(!parallel);
                assert!(!json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn search_accepts_parallel_and_json() {
        let cli = Cli::try_parse_from([
            "search-server", "search", "--input", "docs.json", "--query", "cat", "--parallel", "--json",
            "--page-size", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { parallel, json, page_size, .. } => {
                assert!(parallel);
                assert!(json);
                assert_eq!(page_size, 3);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn run_search_reports_bad_query() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("docs.json");
        fs::write(&file, r#"[{"id": 1, "text": "cat dog"}]"#).unwrap();
        let server = load_server(&corpus_args(&file)).unwrap();
        let output = SearchOutput { page_size: 2, json: true };
        let queries = vec!["cat".to_string(), "--dog".to_string()];
        assert!(run_search(&server, &queries, DocumentStatus::Actual, ExecutionMode::Parallel, output).is_err());
        let queries = vec!["cat".to_string(), "bird".to_string()];
        assert!(run_search(&server, &queries, DocumentStatus::Actual, ExecutionMode::Parallel, output).is_ok());
    }
}
