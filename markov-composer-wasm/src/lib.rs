//! WASM bindings for markov-composer: powers the interactive web demo.

use wasm_bindgen::prelude::*;

use markov_composer::core::composer::Composer;
use markov_composer::core::corpus::{words_from_text, DEFAULT_MAX_WORDS_PER_DOCUMENT};
use markov_composer::core::generator::DeadEndPolicy;

// ---------------------------------------------------------------------------
// Embedded sample corpus, compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const SAMPLE_SONGS: &[(&str, &str)] = &[
        ("harbor_lights", include_str!("../../songs/harbor_lights.txt")),
        ("orchard_road", include_str!("../../songs/orchard_road.txt")),
        ("winter_bells", include_str!("../../songs/winter_bells.txt")),
    ];
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct GraphStats {
    words: usize,
    distinct: usize,
    transitions: usize,
    seed: u64,
}

#[derive(serde::Serialize)]
struct Transition {
    word: String,
    weight: u32,
}

fn parse_policy(s: &str) -> DeadEndPolicy {
    match s.to_lowercase().as_str() {
        "truncate" => DeadEndPolicy::Truncate,
        _ => DeadEndPolicy::Restart,
    }
}

// ---------------------------------------------------------------------------
// ComposerDemo: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct ComposerDemo {
    composer: Composer,
}

#[wasm_bindgen]
impl ComposerDemo {
    /// Train on the embedded sample songs.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<ComposerDemo, JsError> {
        let mut corpus = Vec::new();
        for (_, text) in data::SAMPLE_SONGS {
            corpus.extend(words_from_text(text, DEFAULT_MAX_WORDS_PER_DOCUMENT));
        }
        Self::build(corpus, seed, DeadEndPolicy::default())
    }

    /// Train on caller-supplied text instead of the samples.
    pub fn from_text(text: &str, seed: u64, policy: &str) -> Result<ComposerDemo, JsError> {
        let corpus = words_from_text(text, DEFAULT_MAX_WORDS_PER_DOCUMENT);
        Self::build(corpus, seed, parse_policy(policy))
    }

    /// Compose `length` words and return them as a JSON array.
    pub fn compose(&mut self, length: usize) -> Result<String, JsError> {
        let words = self
            .composer
            .compose(length)
            .map_err(|e| JsError::new(&format!("Composition error: {e}")))?;
        serde_json::to_string(&words)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Compose `length` words rendered as stanzas.
    pub fn compose_stanzas(&mut self, length: usize) -> Result<String, JsError> {
        self.composer
            .compose_stanzas(length)
            .map_err(|e| JsError::new(&format!("Composition error: {e}")))
    }

    /// Return JSON describing the trained graph.
    pub fn stats(&self) -> Result<String, JsError> {
        let graph = self.composer.graph();
        let stats = GraphStats {
            words: self.composer.seed_pool().len(),
            distinct: graph.vertex_count(),
            transitions: graph.edge_count(),
            seed: self.composer.seed(),
        };
        serde_json::to_string(&stats)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return JSON array of `{word, weight}` successors of `word`.
    pub fn successors(&self, word: &str) -> Result<String, JsError> {
        let word = word.to_lowercase();
        let transitions: Vec<Transition> = self
            .composer
            .graph()
            .edges()
            .filter(|(from, _, _)| *from == word)
            .map(|(_, to, weight)| Transition {
                word: to.to_string(),
                weight,
            })
            .collect();
        serde_json::to_string(&transitions)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return JSON array of the embedded sample song names.
    pub fn sample_songs() -> String {
        let names: Vec<&str> = data::SAMPLE_SONGS.iter().map(|(name, _)| *name).collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    /// Restart the random stream from a new seed (same corpus).
    pub fn reset(&mut self, seed: u64) {
        self.composer.reseed(seed);
    }
}

// Private helpers
impl ComposerDemo {
    fn build(
        corpus: Vec<String>,
        seed: u64,
        policy: DeadEndPolicy,
    ) -> Result<ComposerDemo, JsError> {
        let composer = Composer::builder()
            .with_tokens(&corpus)
            .seed(seed)
            .dead_end_policy(policy)
            .build()
            .map_err(|e| JsError::new(&format!("Failed to build composer: {e}")))?;
        Ok(ComposerDemo { composer })
    }
}
