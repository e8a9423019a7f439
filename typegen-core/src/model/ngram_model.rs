use super::state::{Context, State};
use crate::error::{Result, TypegenError};
use rand::Rng;
use rand::prelude::{IndexedRandom, IteratorRandom};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Smallest supported order (one token of context).
pub const MIN_ORDER: usize = 2;
/// Largest supported order.
pub const MAX_ORDER: usize = 5;

/// Represents a word-level n-gram model.
///
/// The `NGramModel` stores one state per context of `n-1` tokens and
/// predicts the next token by weighted sampling of what followed that
/// context in the training tokens.
///
/// # Responsibilities
/// - Build the frequency table from a token sequence
/// - Predict the next token given a context, backing off to the unigram
///   target distribution on a miss
/// - Provide random starting contexts for generation
///
/// # Invariants
/// - `MIN_ORDER <= n <= MAX_ORDER`
/// - Each state in `states` corresponds to a unique context of length `n-1`
/// - Every state has at least one transition, all counts >= 1
/// - `vocabulary` is exactly the set of tokens observed as a target
/// - A built model has at least one state
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NGramModel {
	/// The order of the model (number of tokens in the n-gram)
	n: usize,

	/// Mapping from a context (length n-1) to its corresponding state
	states: BTreeMap<Context, State>,

	/// Every token seen as a target, sorted, used for backoff
	vocabulary: Vec<String>,

	/// Number of tokens the model was built from
	total_tokens: usize,
}

impl NGramModel {
	/// Validates an n-gram order.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `n` is outside `[MIN_ORDER, MAX_ORDER]`.
	pub fn check_order(n: usize) -> Result<()> {
		if !(MIN_ORDER..=MAX_ORDER).contains(&n) {
			return Err(TypegenError::InvalidOrder(n));
		}
		Ok(())
	}

	/// Builds an n-gram model of order `n` from a token sequence.
	///
	/// For every window of `n` consecutive tokens, the first `n-1` are the
	/// context and the last one is the target whose count is incremented.
	///
	/// # Errors
	/// - `InvalidOrder` if `n` is outside `[MIN_ORDER, MAX_ORDER]`
	/// - `InsufficientCorpus` if fewer than `n` tokens are given
	pub fn build(tokens: &[String], n: usize) -> Result<Self> {
		Self::check_order(n)?;
		if tokens.len() < n {
			return Err(TypegenError::InsufficientCorpus { tokens: tokens.len(), n });
		}

		let mut states: BTreeMap<Context, State> = BTreeMap::new();
		let mut targets: BTreeSet<String> = BTreeSet::new();

		for window in tokens.windows(n) {
			let (context, target) = window.split_at(n - 1);
			let target = &target[0];

			let state = states.entry(context.to_vec()).or_insert_with(|| State::new(context));
			state.add_transition(target);
			targets.insert(target.clone());
		}

		Ok(Self {
			n,
			states,
			vocabulary: targets.into_iter().collect(),
			total_tokens: tokens.len(),
		})
	}

	/// The order `n` of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of tokens the model was built from.
	pub fn total_tokens(&self) -> usize {
		self.total_tokens
	}

	/// Number of distinct contexts.
	pub fn context_count(&self) -> usize {
		self.states.len()
	}

	/// Every token the model can emit, sorted.
	pub fn vocabulary(&self) -> &[String] {
		&self.vocabulary
	}

	pub fn contains_context(&self, context: &[String]) -> bool {
		self.states.contains_key(context)
	}

	/// Continuations observed after `context`, with their counts.
	pub fn counts(&self, context: &[String]) -> Option<&BTreeMap<String, usize>> {
		self.states.get(context).map(State::transitions)
	}

	pub fn contexts(&self) -> impl Iterator<Item = &[String]> {
		self.states.keys().map(Vec::as_slice)
	}

	/// Returns a random context key, uniformly among the known contexts.
	///
	/// Useful for starting a generation sequence.
	/// Returns `None` if the model has no states.
	pub fn random_context<R: Rng>(&self, rng: &mut R) -> Option<Context> {
		self.states.keys().choose(rng).cloned()
	}

	/// Predicts the token following `context`.
	///
	/// The probability of each continuation is proportional to how often it
	/// followed `context`. When `context` was never observed, falls back to
	/// a uniform pick among every token seen as a target.
	///
	/// Only returns `None` for a model without any target, which `build`
	/// never produces.
	pub fn sample_next<R: Rng>(&self, context: &[String], rng: &mut R) -> Option<String> {
		if let Some(state) = self.states.get(context) {
			if let Some(token) = state.predict(rng) {
				return Some(token.to_owned());
			}
		}
		self.vocabulary.choose(rng).cloned()
	}
}
