//! N-gram phrase generation for a typing trainer.
//!
//! This crate turns a difficulty-tiered word corpus into practice phrases:
//! - Corpus sections (easy / medium / hard) and their on-disk store
//! - A shared text normalizer
//! - Word-level n-gram models with weighted sampling and backoff
//! - A phrase generator with a per-section model cache
//! - Difficulty statistics and corpus integrity checks
//!
//! Randomness is always injected, so every result can be reproduced from
//! a seed.

/// Difficulty statistics and corpus/generation integrity checks.
pub mod analysis;

/// Generator and analyzer tunables.
pub mod config;

/// Corpus sections and their persistence.
pub mod corpus;

/// Error type shared by the whole crate.
pub mod error;

/// N-gram models and phrase generation.
pub mod model;

/// Text normalization.
pub mod tokenizer;

/// File helpers (whole-file reads, atomic writes).
///
/// Not exposed
pub(crate) mod io;

pub use corpus::store::CorpusStore;
pub use corpus::{Corpus, Difficulty, SectionText};
pub use error::{Result, TypegenError};
pub use model::generator::{ModelStats, PhraseGenerator};
