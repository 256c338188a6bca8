/// Graph Dump: prints every weighted transition learned from a corpus.
///
/// Usage: graph_dump --corpus <dir> [--max-words <n>] [--from <word>]
use std::env;
use std::path::PathBuf;
use std::process;

use markov_composer::core::corpus::{load_corpus_dir, DEFAULT_MAX_WORDS_PER_DOCUMENT};
use markov_composer::core::graph::WordGraph;

const USAGE: &str = "Usage: graph_dump --corpus <dir> [--max-words <n>] [--from <word>]";

fn main() {
    markov_composer::logging::init_tracing("warn");

    let args: Vec<String> = env::args().collect();

    let mut corpus = None;
    let mut max_words = DEFAULT_MAX_WORDS_PER_DOCUMENT;
    let mut from = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--corpus" if i + 1 < args.len() => {
                i += 1;
                corpus = Some(PathBuf::from(&args[i]));
            }
            "--max-words" if i + 1 < args.len() => {
                i += 1;
                max_words = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --max-words expects a non-negative integer");
                    process::exit(1);
                });
            }
            "--from" if i + 1 < args.len() => {
                i += 1;
                from = Some(args[i].to_lowercase());
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let corpus = corpus.unwrap_or_else(|| {
        eprintln!("Error: --corpus is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let words = load_corpus_dir(&corpus, max_words).unwrap_or_else(|e| {
        eprintln!("Error reading corpus '{}': {}", corpus.display(), e);
        process::exit(1);
    });

    let graph = WordGraph::build(&words).unwrap_or_else(|e| {
        eprintln!("Error building graph: {}", e);
        process::exit(1);
    });

    for (source, target, weight) in graph.edges() {
        if from.as_deref().is_some_and(|f| f != source) {
            continue;
        }
        println!("{} -> {} ({})", source, target, weight);
    }

    println!(
        "{} words, {} distinct, {} transitions",
        words.len(),
        graph.vertex_count(),
        graph.edge_count()
    );
}
