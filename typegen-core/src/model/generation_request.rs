use crate::corpus::Difficulty;
use crate::error::{Result, TypegenError};
use crate::model::ngram_model::NGramModel;

/// Fewest phrases a custom request may ask for.
pub const MIN_PHRASES: usize = 3;
/// Most phrases a custom request may ask for.
pub const MAX_PHRASES: usize = 15;

/// Parameters of one generation call.
///
/// # Responsibilities
/// - Provide the preset (order, phrase count) of each difficulty
/// - Validate custom settings before they reach the generator
///
/// # Invariants
/// - `n` is a supported n-gram order
/// - `num_phrases` is in `[MIN_PHRASES, MAX_PHRASES]` for custom requests
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
	difficulty: Difficulty,
	n: usize,
	num_phrases: usize,
}

impl GenerationRequest {
	/// Preset settings: short contexts for easy text, longer ones for hard.
	///
	/// - easy: bigrams, 5 phrases
	/// - medium: trigrams, 8 phrases
	/// - hard: 4-grams, 10 phrases
	pub fn preset(difficulty: Difficulty) -> Self {
		let (n, num_phrases) = match difficulty {
			Difficulty::Easy => (2, 5),
			Difficulty::Medium => (3, 8),
			Difficulty::Hard => (4, 10),
		};
		Self { difficulty, n, num_phrases }
	}

	/// Custom settings.
	///
	/// # Errors
	/// Returns an error if `n` or `num_phrases` is out of range.
	pub fn custom(difficulty: Difficulty, n: usize, num_phrases: usize) -> Result<Self> {
		let mut request = Self::preset(difficulty);
		request.set_order(n)?;
		request.set_num_phrases(num_phrases)?;
		Ok(request)
	}

	pub fn difficulty(&self) -> Difficulty {
		self.difficulty
	}

	pub fn order(&self) -> usize {
		self.n
	}

	pub fn num_phrases(&self) -> usize {
		self.num_phrases
	}

	/// Sets the n-gram order.
	///
	/// # Errors
	/// Returns `InvalidOrder` if the value is outside `[2, 5]`.
	pub fn set_order(&mut self, n: usize) -> Result<()> {
		NGramModel::check_order(n)?;
		self.n = n;
		Ok(())
	}

	/// Sets the number of phrases.
	///
	/// # Errors
	/// Returns an error if the value is outside `[MIN_PHRASES, MAX_PHRASES]`.
	pub fn set_num_phrases(&mut self, num_phrases: usize) -> Result<()> {
		if !(MIN_PHRASES..=MAX_PHRASES).contains(&num_phrases) {
			return Err(TypegenError::InvalidParameter(format!(
				"Number of phrases must be between {} and {}, got {}",
				MIN_PHRASES, MAX_PHRASES, num_phrases
			)));
		}
		self.num_phrases = num_phrases;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Difficulty::Easy, 2, 5)]
	#[case(Difficulty::Medium, 3, 8)]
	#[case(Difficulty::Hard, 4, 10)]
	fn presets(#[case] difficulty: Difficulty, #[case] n: usize, #[case] phrases: usize) {
		let request = GenerationRequest::preset(difficulty);
		assert_eq!(request.difficulty(), difficulty);
		assert_eq!(request.order(), n);
		assert_eq!(request.num_phrases(), phrases);
	}

	#[test]
	fn custom_validates_ranges() {
		assert!(GenerationRequest::custom(Difficulty::Easy, 5, 15).is_ok());
		assert!(matches!(
			GenerationRequest::custom(Difficulty::Easy, 1, 5),
			Err(TypegenError::InvalidOrder(1))
		));
		assert!(matches!(
			GenerationRequest::custom(Difficulty::Easy, 3, 2),
			Err(TypegenError::InvalidParameter(_))
		));
		assert!(GenerationRequest::custom(Difficulty::Easy, 3, 16).is_err());
	}

	#[test]
	fn failed_setter_keeps_previous_value() {
		let mut request = GenerationRequest::preset(Difficulty::Medium);
		assert!(request.set_order(9).is_err());
		assert_eq!(request.order(), 3);
	}
}
