/// Compose: builds a word graph from a directory of texts and prints a
/// stanza-formatted composition.
///
/// Usage: compose [--config <file.ron>] [--corpus <dir>] [--length <n>]
///                [--seed <n>] [--policy <restart|truncate>] [--max-words <n>]
use std::env;
use std::path::{Path, PathBuf};
use std::process;

use markov_composer::core::config::ComposerConfig;
use markov_composer::core::generator::DeadEndPolicy;
use markov_composer::ComposerBuilder;

const USAGE: &str = "Usage: compose [--config <file.ron>] [--corpus <dir>] [--length <n>] \
[--seed <n>] [--policy <restart|truncate>] [--max-words <n>]";

fn main() {
    markov_composer::logging::init_tracing("warn");

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut corpus = None;
    let mut length = None;
    let mut seed = None;
    let mut policy = None;
    let mut max_words = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--corpus" if i + 1 < args.len() => {
                i += 1;
                corpus = Some(PathBuf::from(&args[i]));
            }
            "--length" if i + 1 < args.len() => {
                i += 1;
                length = Some(parse_number(&args[i], "--length"));
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = Some(parse_number(&args[i], "--seed"));
            }
            "--policy" if i + 1 < args.len() => {
                i += 1;
                policy = Some(parse_policy(&args[i]));
            }
            "--max-words" if i + 1 < args.len() => {
                i += 1;
                max_words = Some(parse_number(&args[i], "--max-words"));
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

    let mut config = match config_path {
        Some(ref path) => ComposerConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path, e);
            process::exit(1);
        }),
        None => ComposerConfig::default(),
    };

    if let Some(dir) = corpus {
        config.corpus_dir = dir;
    }
    if let Some(n) = length {
        config.length = n;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(p) = policy {
        config.dead_end_policy = p;
    }
    if let Some(n) = max_words {
        config.max_words_per_document = n;
    }

    let mut composer = ComposerBuilder::from_config(&config)
        .build()
        .unwrap_or_else(|e| {
            eprintln!(
                "Error building composer from '{}': {}",
                config.corpus_dir.display(),
                e
            );
            process::exit(1);
        });

    let text = composer.compose_stanzas(config.length).unwrap_or_else(|e| {
        eprintln!("Error composing: {}", e);
        process::exit(1);
    });

    println!("{}", text);
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("Error: {} expects a non-negative integer, got '{}'", flag, value);
        process::exit(1);
    })
}

fn parse_policy(value: &str) -> DeadEndPolicy {
    match value.to_lowercase().as_str() {
        "restart" => DeadEndPolicy::Restart,
        "truncate" => DeadEndPolicy::Truncate,
        other => {
            eprintln!("Error: --policy must be 'restart' or 'truncate', got '{}'", other);
            process::exit(1);
        }
    }
}
