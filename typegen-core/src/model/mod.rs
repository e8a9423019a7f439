//! Word-level n-gram modelling and phrase generation.
//!
//! - Fixed-order n-gram tables (`NGramModel`)
//! - Per-context transition counts (`State`)
//! - Generation parameters and difficulty presets (`GenerationRequest`)
//! - The phrase generator with its model cache (`PhraseGenerator`)

/// Phrase generation over corpus sections.
///
/// Owns the random source, caches built models per (section, n) and
/// turns sparse-data failures into empty results.
pub mod generator;

/// Fixed-order n-gram model (`2 <= n <= 5`).
///
/// Handles table construction, weighted next-token prediction with
/// unigram backoff, and random context selection.
pub mod ngram_model;

/// A single context of the table and its observed continuations.
pub mod state;

/// Validated generation parameters and per-difficulty presets.
pub mod generation_request;
