//! Weighted random walks over a frozen [`WordGraph`] and stanza rendering.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::graph::{GraphError, NextWord, VertexId, WordGraph};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("seed pool is empty")]
    EmptyCorpus,
    #[error("seed token '{0}' has no vertex in the graph")]
    SeedNotInGraph(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// What a walk does when it reaches a word that never had a successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeadEndPolicy {
    /// Stop and return the words produced so far.
    Truncate,
    /// Jump to a fresh seed from the seed pool and keep walking, so the
    /// output always reaches the requested length.
    #[default]
    Restart,
}

/// Default words per stanza.
pub const DEFAULT_STANZA_SIZE: usize = 9;
/// Default stanza stride for the extra blank line.
pub const DEFAULT_GROUP_SIZE: usize = 4;

/// Walk the graph for `length` words.
///
/// The first word is drawn uniformly from `seed_pool`, so tokens that occur
/// often in the corpus are proportionally more likely to open the walk.
/// Each following word is sampled from the previous word's successors by
/// transition weight.
pub fn generate<S, R>(
    graph: &WordGraph,
    seed_pool: &[S],
    length: usize,
    policy: DeadEndPolicy,
    rng: &mut R,
) -> Result<Vec<String>, GenerateError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if seed_pool.is_empty() {
        return Err(GenerateError::EmptyCorpus);
    }

    let mut words = Vec::with_capacity(length);
    if length == 0 {
        return Ok(words);
    }

    let mut current = pick_seed(graph, seed_pool, rng)?;
    let mut restarts = 0usize;
    loop {
        let token = graph
            .token(current)
            .ok_or(GraphError::UnknownVertex(current))?;
        words.push(token.to_string());
        if words.len() == length {
            break;
        }

        match graph.sample_next(current, rng)? {
            NextWord::Next(next) => current = next,
            NextWord::DeadEnd => match policy {
                DeadEndPolicy::Truncate => {
                    warn!(
                        word = token,
                        produced = words.len(),
                        requested = length,
                        "dead end reached, truncating composition"
                    );
                    break;
                }
                DeadEndPolicy::Restart => {
                    restarts += 1;
                    current = pick_seed(graph, seed_pool, rng)?;
                }
            },
        }
    }

    debug!(words = words.len(), restarts, "composition walk finished");
    Ok(words)
}

fn pick_seed<S, R>(
    graph: &WordGraph,
    seed_pool: &[S],
    rng: &mut R,
) -> Result<VertexId, GenerateError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let token = seed_pool
        .choose(rng)
        .ok_or(GenerateError::EmptyCorpus)?
        .as_ref();
    graph
        .get(token)
        .ok_or_else(|| GenerateError::SeedNotInGraph(token.to_string()))
}

/// Render words as capitalized stanzas.
///
/// Stanzas hold `stanza_size` words (the last may be shorter) and are
/// separated by a blank line. Stanzas 2, 2 + `group_size`, 2 + 2 *
/// `group_size`, ... (0-based) get one more blank line after them. A
/// `stanza_size` of zero is treated as one; a `group_size` of zero disables
/// the extra blank lines.
pub fn format_stanzas<S: AsRef<str>>(
    words: &[S],
    stanza_size: usize,
    group_size: usize,
) -> String {
    let mut stanzas: Vec<String> = words
        .chunks(stanza_size.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|w| capitalize(w.as_ref()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    if group_size > 0 {
        for i in (2..stanzas.len()).step_by(group_size) {
            stanzas[i].push('\n');
        }
    }

    stanzas.join("\n\n")
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SCENARIO: [&str; 6] = ["a", "b", "a", "b", "a", "c"];

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("w{}", i)).collect()
    }

    #[test]
    fn generate_restart_reaches_requested_length() {
        let graph = WordGraph::build(&SCENARIO).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let words = generate(&graph, &SCENARIO, 200, DeadEndPolicy::Restart, &mut rng).unwrap();
        assert_eq!(words.len(), 200);
        assert!(words.iter().all(|w| ["a", "b", "c"].contains(&w.as_str())));
    }

    #[test]
    fn generate_truncates_at_dead_end() {
        let tokens = ["one", "two", "three"];
        let graph = WordGraph::build(&tokens).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let words = generate(&graph, &["one"], 10, DeadEndPolicy::Truncate, &mut rng).unwrap();
        assert_eq!(words, vec!["one", "two", "three"]);
    }

    #[test]
    fn generate_restarts_from_seed_pool() {
        let tokens = ["one", "two", "three"];
        let graph = WordGraph::build(&tokens).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let words = generate(&graph, &["one"], 7, DeadEndPolicy::Restart, &mut rng).unwrap();
        assert_eq!(
            words,
            vec!["one", "two", "three", "one", "two", "three", "one"]
        );
    }

    #[test]
    fn dead_end_on_last_word_is_not_sampled() {
        let graph = WordGraph::build(&["one", "two"]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let words = generate(&graph, &["one"], 2, DeadEndPolicy::Truncate, &mut rng).unwrap();
        assert_eq!(words, vec!["one", "two"]);
    }

    #[test]
    fn generate_deterministic() {
        let graph = WordGraph::build(&SCENARIO).unwrap();
        let mut rng1 = StdRng::seed_from_u64(9);
        let mut rng2 = StdRng::seed_from_u64(9);
        let first = generate(&graph, &SCENARIO, 50, DeadEndPolicy::Restart, &mut rng1).unwrap();
        let second = generate(&graph, &SCENARIO, 50, DeadEndPolicy::Restart, &mut rng2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn generate_empty_pool_is_error() {
        let graph = WordGraph::build(&SCENARIO).unwrap();
        let pool: [&str; 0] = [];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(&graph, &pool, 5, DeadEndPolicy::Restart, &mut rng),
            Err(GenerateError::EmptyCorpus)
        );
    }

    #[test]
    fn generate_unknown_seed_is_error() {
        let graph = WordGraph::build(&SCENARIO).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(&graph, &["zebra"], 5, DeadEndPolicy::Restart, &mut rng),
            Err(GenerateError::SeedNotInGraph("zebra".to_string()))
        );
    }

    #[test]
    fn generate_zero_length_is_empty() {
        let graph = WordGraph::build(&SCENARIO).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let words = generate(&graph, &SCENARIO, 0, DeadEndPolicy::Truncate, &mut rng).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn generate_follows_observed_transitions() {
        let graph = WordGraph::build(&SCENARIO).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let words = generate(&graph, &SCENARIO, 100, DeadEndPolicy::Truncate, &mut rng).unwrap();
        assert!(!words.is_empty() && words.len() <= 100);
        for pair in words.windows(2) {
            assert!(
                graph.edge_weight(&pair[0], &pair[1]) > 0,
                "walk used unobserved transition {} -> {}",
                pair[0],
                pair[1]
            );
        }
        if words.len() < 100 {
            assert_eq!(words.last().map(String::as_str), Some("c"));
        }
    }

    #[test]
    fn format_small_exact() {
        let words = numbered(10);
        let text = format_stanzas(&words, 3, 4);
        assert_eq!(text, "W1 W2 W3\n\nW4 W5 W6\n\nW7 W8 W9\n\n\nW10");
    }

    #[test]
    fn format_fifty_words_into_six_stanzas() {
        let words = numbered(50);
        let text = format_stanzas(&words, DEFAULT_STANZA_SIZE, DEFAULT_GROUP_SIZE);
        let stanzas: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        let sizes: Vec<usize> = stanzas.iter().map(|s| s.split(' ').count()).collect();
        assert_eq!(sizes, vec![9, 9, 9, 9, 9, 5]);
        assert_eq!(text.matches("\n\n\n").count(), 1);
        assert!(text.starts_with("W1 W2"));
    }

    #[test]
    fn format_extra_break_every_group() {
        let words = numbered(99);
        let text = format_stanzas(&words, 9, 4);
        // Stanzas 2, 6 and 10; the last one is also the final stanza.
        assert_eq!(text.matches("\n\n\n").count(), 2);
        assert!(text.ends_with("W99\n"));
    }

    #[test]
    fn format_capitalizes_words() {
        let text = format_stanzas(&["hello", "wORLD", "éclair", ""], 9, 4);
        assert_eq!(text, "Hello World Éclair ");
    }

    #[test]
    fn format_empty_is_empty() {
        let words: [&str; 0] = [];
        assert_eq!(format_stanzas(&words, 9, 4), "");
    }

    #[test]
    fn format_zero_sizes_are_clamped() {
        let text = format_stanzas(&["a", "b", "c"], 0, 0);
        assert_eq!(text, "A\n\nB\n\nC");
    }
}
