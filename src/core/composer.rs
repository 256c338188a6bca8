//! Top-level composer: corpus in, stanzas out.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::config::{ComposerConfig, ConfigError};
use crate::core::corpus::{self, CorpusError, DEFAULT_MAX_WORDS_PER_DOCUMENT};
use crate::core::generator::{
    self, DeadEndPolicy, GenerateError, DEFAULT_GROUP_SIZE, DEFAULT_STANZA_SIZE,
};
use crate::core::graph::{GraphError, WordGraph};

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// A frozen word graph plus the seed pool and RNG used to walk it.
/// Built via `Composer::builder()`.
pub struct Composer {
    graph: WordGraph,
    seed_pool: Vec<String>,
    rng: StdRng,
    seed: u64,
    policy: DeadEndPolicy,
    stanza_size: usize,
    group_size: usize,
}

/// Builder for constructing a `Composer`.
pub struct ComposerBuilder {
    corpus_dir: Option<PathBuf>,
    /// Directly provided tokens (for testing without files).
    tokens: Option<Vec<String>>,
    seed: Option<u64>,
    policy: DeadEndPolicy,
    max_words_per_document: usize,
    stanza_size: usize,
    group_size: usize,
}

impl Composer {
    pub fn builder() -> ComposerBuilder {
        ComposerBuilder {
            corpus_dir: None,
            tokens: None,
            seed: None,
            policy: DeadEndPolicy::default(),
            max_words_per_document: DEFAULT_MAX_WORDS_PER_DOCUMENT,
            stanza_size: DEFAULT_STANZA_SIZE,
            group_size: DEFAULT_GROUP_SIZE,
        }
    }

    /// Walk the graph for `length` words.
    pub fn compose(&mut self, length: usize) -> Result<Vec<String>, ComposeError> {
        let words = generator::generate(
            &self.graph,
            &self.seed_pool,
            length,
            self.policy,
            &mut self.rng,
        )?;
        Ok(words)
    }

    /// Walk the graph and render the result as stanzas.
    pub fn compose_stanzas(&mut self, length: usize) -> Result<String, ComposeError> {
        let words = self.compose(length)?;
        Ok(generator::format_stanzas(
            &words,
            self.stanza_size,
            self.group_size,
        ))
    }

    /// Restart the random stream from `seed`, keeping the trained graph.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn graph(&self) -> &WordGraph {
        &self.graph
    }

    pub fn seed_pool(&self) -> &[String] {
        &self.seed_pool
    }

    /// The seed the RNG was last started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ComposerBuilder {
    /// Start from a loaded config. The config's `length` is a per-call
    /// argument and is not captured here.
    pub fn from_config(config: &ComposerConfig) -> Self {
        let mut builder = Composer::builder()
            .corpus_dir(config.corpus_dir.clone())
            .dead_end_policy(config.dead_end_policy)
            .max_words_per_document(config.max_words_per_document)
            .stanzas(config.stanza_size, config.group_size);
        builder.seed = config.seed;
        builder
    }

    pub fn corpus_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_dir = Some(path.into());
        self
    }

    /// Provide tokens directly (for testing without files).
    pub fn with_tokens<S: AsRef<str>>(mut self, tokens: &[S]) -> Self {
        self.tokens = Some(tokens.iter().map(|t| t.as_ref().to_string()).collect());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn dead_end_policy(mut self, policy: DeadEndPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn max_words_per_document(mut self, max_words: usize) -> Self {
        self.max_words_per_document = max_words;
        self
    }

    pub fn stanzas(mut self, stanza_size: usize, group_size: usize) -> Self {
        self.stanza_size = stanza_size;
        self.group_size = group_size;
        self
    }

    pub fn build(self) -> Result<Composer, ComposeError> {
        let mut tokens = self.tokens.unwrap_or_default();

        if let Some(ref dir) = self.corpus_dir {
            tokens.extend(corpus::load_corpus_dir(dir, self.max_words_per_document)?);
        }

        let graph = WordGraph::build(&tokens)?;
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(
            words = tokens.len(),
            vertices = graph.vertex_count(),
            seed,
            "composer ready"
        );
        debug!(policy = ?self.policy, "dead end policy");

        Ok(Composer {
            graph,
            seed_pool: tokens,
            rng: StdRng::seed_from_u64(seed),
            seed,
            policy: self.policy,
            stanza_size: self.stanza_size,
            group_size: self.group_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LYRICS: &str = "the night is young and the night is long \
        and we sing the song of the night until the morning comes";

    fn build_test_composer(seed: u64) -> Composer {
        let tokens = corpus::words_from_text(LYRICS, DEFAULT_MAX_WORDS_PER_DOCUMENT);
        Composer::builder()
            .with_tokens(&tokens)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_with_seed() {
        let composer = build_test_composer(12345);
        assert_eq!(composer.seed(), 12345);
        assert!(composer.graph().is_frozen());
        assert_eq!(composer.seed_pool().len(), 21);
    }

    #[test]
    fn builder_without_corpus_is_empty_error() {
        let result = Composer::builder().seed(1).build();
        assert!(matches!(
            result,
            Err(ComposeError::Graph(GraphError::EmptyCorpus))
        ));
    }

    #[test]
    fn compose_deterministic_same_seed() {
        let mut first = build_test_composer(42);
        let mut second = build_test_composer(42);
        assert_eq!(first.compose(60).unwrap(), second.compose(60).unwrap());
    }

    #[test]
    fn compose_different_with_different_seed() {
        let baseline = build_test_composer(1).compose(40).unwrap();
        let found_different =
            (2..50).any(|seed| build_test_composer(seed).compose(40).unwrap() != baseline);
        assert!(found_different, "Expected different output with different seeds");
    }

    #[test]
    fn reseed_replays_stream() {
        let mut composer = build_test_composer(8);
        let first = composer.compose(30).unwrap();
        composer.reseed(8);
        assert_eq!(composer.compose(30).unwrap(), first);
    }

    #[test]
    fn compose_restart_fills_length() {
        // "comes" only appears last, so walks can dead-end there.
        let mut composer = build_test_composer(3);
        for _ in 0..20 {
            assert_eq!(composer.compose(100).unwrap().len(), 100);
        }
    }

    #[test]
    fn compose_stanzas_uses_configured_sizes() {
        let tokens = corpus::words_from_text(LYRICS, DEFAULT_MAX_WORDS_PER_DOCUMENT);
        let mut composer = Composer::builder()
            .with_tokens(&tokens)
            .seed(5)
            .stanzas(3, 2)
            .build()
            .unwrap();
        let text = composer.compose_stanzas(9).unwrap();
        let stanzas: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(stanzas.len(), 3);
        assert!(stanzas
            .iter()
            .all(|s| s.split(' ').all(|w| w.chars().next().is_some_and(char::is_uppercase))));
    }

    #[test]
    fn from_config_carries_settings() {
        let config = ComposerConfig {
            corpus_dir: PathBuf::from("tests/fixtures/songs"),
            seed: Some(77),
            dead_end_policy: DeadEndPolicy::Truncate,
            ..ComposerConfig::default()
        };
        let composer = ComposerBuilder::from_config(&config).build().unwrap();
        assert_eq!(composer.seed(), 77);
        assert_eq!(composer.policy, DeadEndPolicy::Truncate);
        assert!(!composer.graph().is_empty());
    }
}
