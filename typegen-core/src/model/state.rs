use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

/// A context of the n-gram table: the `n-1` tokens preceding a target.
pub type Context = Vec<String>;

/// Represents one context of an n-gram table.
///
/// A `State` stores every token observed right after its context (`key`),
/// together with how many times it was observed.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
/// - A state held by a model has at least one transition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct State {
	/// The `n-1` preceding tokens.
	key: Context,
	/// Outgoing transitions indexed by the next token.
	/// Example: { "cat" => 2, "mat" => 1 }
	/// Ordered so that seeded sampling is reproducible.
	transitions: BTreeMap<String, usize>,
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(key: &[String]) -> Self {
		Self {
			key: key.to_vec(),
			transitions: BTreeMap::new(),
		}
	}

	pub fn key(&self) -> &[String] {
		&self.key
	}

	/// Records one more occurrence of `next_token` after this context.
	pub fn add_transition(&mut self, next_token: &str) {
		*self.transitions.entry(next_token.to_owned()).or_insert(0) += 1;
	}

	/// Observed continuations and their counts.
	pub fn transitions(&self) -> &BTreeMap<String, usize> {
		&self.transitions
	}

	/// Picks the next token with probability proportional to its count.
	///
	/// Draws one integer in `0..total` and walks the cumulative counts.
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		let total: usize = self.transitions.values().sum();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (next_token, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_token);
			}
			r -= occurrence;
		}

		// Unreachable while counts sum to `total`
		self.transitions.keys().next_back().map(String::as_str)
	}
}
