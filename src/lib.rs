//! Markov Composer: word-level Markov chain text generation.
//!
//! Builds a first-order transition graph over the words of a text corpus,
//! freezes it into weighted sampling tables, and random-walks it to produce
//! compositions rendered as stanzas.

pub mod core;
pub mod logging;

pub use crate::core::composer::{ComposeError, Composer, ComposerBuilder};
pub use crate::core::config::ComposerConfig;
pub use crate::core::generator::{format_stanzas, generate, DeadEndPolicy};
pub use crate::core::graph::{NextWord, WordGraph};
