//! Run configuration, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::corpus::DEFAULT_MAX_WORDS_PER_DOCUMENT;
use crate::core::generator::{DeadEndPolicy, DEFAULT_GROUP_SIZE, DEFAULT_STANZA_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Settings for one composition run. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Directory of plain-text source documents.
    pub corpus_dir: PathBuf,
    /// Words kept from the start of each document.
    pub max_words_per_document: usize,
    /// Words in the composition.
    pub length: usize,
    pub stanza_size: usize,
    pub group_size: usize,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub dead_end_policy: DeadEndPolicy,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("songs"),
            max_words_per_document: DEFAULT_MAX_WORDS_PER_DOCUMENT,
            length: 300,
            stanza_size: DEFAULT_STANZA_SIZE,
            group_size: DEFAULT_GROUP_SIZE,
            seed: None,
            dead_end_policy: DeadEndPolicy::default(),
        }
    }
}

impl ComposerConfig {
    /// Load a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<ComposerConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a config from a RON string.
    pub fn parse_ron(input: &str) -> Result<ComposerConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}
