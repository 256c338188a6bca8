//! Corpus loading: turns plain-text documents into normalized word tokens.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no documents found in '{0}'")]
    NoDocuments(PathBuf),
}

/// Default cap on words taken from a single document.
pub const DEFAULT_MAX_WORDS_PER_DOCUMENT: usize = 3000;

/// Collapse whitespace, lowercase, and strip ASCII punctuation.
pub fn normalize_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Normalize `text` and return at most `max_words` tokens.
pub fn words_from_text(text: &str, max_words: usize) -> Vec<String> {
    normalize_text(text)
        .split_whitespace()
        .take(max_words)
        .map(str::to_owned)
        .collect()
}

/// Read one UTF-8 document and tokenize it.
pub fn read_document(path: &Path, max_words: usize) -> Result<Vec<String>, CorpusError> {
    let text = std::fs::read_to_string(path)?;
    let words = words_from_text(&text, max_words);
    trace!(path = %path.display(), words = words.len(), "read document");
    Ok(words)
}

/// Tokenize every visible file in `dir` and concatenate the results.
///
/// Files are read in file-name order so the same directory always yields the
/// same token sequence. Hidden files (`.DS_Store` and friends) and
/// subdirectories are skipped.
pub fn load_corpus_dir(dir: &Path, max_words: usize) -> Result<Vec<String>, CorpusError> {
    let mut documents: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|s| s.to_str())
            .map_or(true, |name| name.starts_with('.'));
        if path.is_file() && !hidden {
            documents.push(path);
        }
    }

    if documents.is_empty() {
        return Err(CorpusError::NoDocuments(dir.to_path_buf()));
    }
    documents.sort();

    let mut words = Vec::new();
    for path in &documents {
        words.extend(read_document(path, max_words)?);
    }

    debug!(
        dir = %dir.display(),
        documents = documents.len(),
        words = words.len(),
        "loaded corpus"
    );
    Ok(words)
}
