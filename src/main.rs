use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use log::error;
use jurisdex::analysis::analyzer::Analyzer;
use jurisdex::analysis::synonyms::StaticSynonyms;
use jurisdex::core::config::Config;
use jurisdex::core::error::{Error, ErrorKind, Result};
use jurisdex::core::types::DocId;
use jurisdex::corpus::csv_source::CsvSource;
use jurisdex::index::indexer::Indexer;
use jurisdex::query::parser::QueryParser;
use jurisdex::search::engine::SearchEngine;

/// Written next to the working directory by `index`, read back by
/// `search`.
const DOCUMENT_FILE: &str = "document.txt";

#[derive(Parser)]
#[command(name = "jurisdex", version, about = "Legal opinion search engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the postings, dictionary and document files from a CSV corpus
    Index {
        /// Corpus CSV: doc_id, title, content, date_posted, court
        #[arg(short = 'i', long = "input")]
        input: PathBuf,
        /// Dictionary output file
        #[arg(short = 'd', long = "dictionary")]
        dictionary: PathBuf,
        /// Postings output file
        #[arg(short = 'p', long = "postings")]
        postings: PathBuf,
        /// Stop after the first N records
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run a query file against a built index
    Search {
        /// Dictionary file written by `index`
        #[arg(short = 'd', long = "dictionary")]
        dictionary: PathBuf,
        /// Postings file written by `index`
        #[arg(short = 'p', long = "postings")]
        postings: PathBuf,
        /// Query file: first line is the query, then one relevant doc id per line
        #[arg(short = 'q', long = "query")]
        query: PathBuf,
        /// Output file for the result doc ids
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
        /// JSON synonym table enabling lexical query expansion
        #[arg(long = "synonyms")]
        synonyms: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    // clap exits with code 2 on its own usage errors
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Index {
            input,
            dictionary,
            postings,
            limit,
        } => run_index(&input, &dictionary, &postings, limit),
        Command::Search {
            dictionary,
            postings,
            query,
            output,
            synonyms,
        } => run_search(&dictionary, &postings, &query, &output, synonyms.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.kind == ErrorKind::Usage => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_index(
    input: &Path,
    dictionary: &Path,
    postings: &Path,
    limit: Option<usize>,
) -> Result<()> {
    let analyzer = Analyzer::standard_english();
    let mut source = CsvSource::new(input);
    let mut indexer = Indexer::new(
        &analyzer,
        Config::default(),
        postings,
        dictionary,
        PathBuf::from(DOCUMENT_FILE),
    );
    indexer.index(&mut source, limit)
}

fn run_search(
    dictionary: &Path,
    postings: &Path,
    query: &Path,
    output: &Path,
    synonyms: Option<&Path>,
) -> Result<()> {
    let analyzer = Analyzer::standard_english();
    let mut engine = SearchEngine::open(
        dictionary,
        Path::new(DOCUMENT_FILE),
        postings,
        Config::default(),
    )?;
    if let Some(path) = synonyms {
        engine = engine.with_synonyms(Box::new(StaticSynonyms::from_json_file(path)?));
    }

    let (line, relevant) = read_query_file(query)?;
    let parser = QueryParser::new(&analyzer);
    match parser.parse(&line) {
        Ok(parsed) => {
            let result = engine.search(&parsed, &relevant)?;
            let rendered: Vec<String> = result.iter().map(|id| id.to_string()).collect();
            fs::write(output, format!("{}\n", rendered.join(" ")))?;
        }
        Err(err) if err.kind == ErrorKind::Parse => {
            // a malformed query is reported in the output file, not the
            // exit status
            fs::write(output, format!("{}\n", err))?;
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// First line is the query; every following non-empty line is one
/// relevance-judged doc id.
fn read_query_file(path: &Path) -> Result<(String, Vec<DocId>)> {
    let raw = fs::read_to_string(path)?;
    let mut lines = raw.lines();
    let query = lines.next().unwrap_or("").trim().to_string();

    let mut relevant = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let id = line.parse::<u64>().map_err(|_| {
            Error::new(
                ErrorKind::Format,
                format!("invalid relevant doc id: {:?}", line),
            )
        })?;
        relevant.push(DocId(id));
    }
    Ok((query, relevant))
}
