use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::corpus::{Corpus, Difficulty};
use crate::error::Result;
use crate::model::generation_request::GenerationRequest;
use crate::model::ngram_model::NGramModel;
use crate::tokenizer::normalize;

/// Size figures of one section and the model built over it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ModelStats {
	/// Tokens in the section after normalization
	pub total_tokens: usize,
	/// Distinct tokens in the section
	pub unique_words: usize,
	/// Distinct tokens the model can emit (0 if no model could be built)
	pub vocabulary_size: usize,
}

/// A model together with the fingerprint of the text it was built from.
#[derive(Debug)]
struct CachedModel {
	fingerprint: u64,
	model: NGramModel,
}

/// Generates practice phrases from the sections of a corpus.
///
/// # Responsibilities
/// - Build (or reuse) the n-gram model of a section
/// - Sample phrases of a bounded length from it
/// - Turn every sparse-data failure into an empty result
///
/// All randomness comes from the owned `rng`; two generators created with
/// the same seed and fed the same calls produce the same phrases.
///
/// Built models are cached per (difficulty, n). A cached model is only
/// reused while the section text still has the fingerprint it was built
/// from, so edits to the corpus are always picked up.
#[derive(Debug)]
pub struct PhraseGenerator<R: Rng = StdRng> {
	rng: R,
	config: GeneratorConfig,
	cache: HashMap<(Difficulty, usize), CachedModel>,
}

impl PhraseGenerator<StdRng> {
	/// Creates a generator seeded from the operating system.
	pub fn new(config: GeneratorConfig) -> Self {
		Self::with_rng(config, StdRng::from_os_rng())
	}

	/// Creates a reproducible generator.
	pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
		Self::with_rng(config, StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> PhraseGenerator<R> {
	pub fn with_rng(config: GeneratorConfig, rng: R) -> Self {
		Self { rng, config, cache: HashMap::new() }
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.config
	}

	/// Number of models currently cached.
	pub fn cached_models(&self) -> usize {
		self.cache.len()
	}

	/// Drops every cached model.
	pub fn clear_cache(&mut self) {
		self.cache.clear();
	}

	/// Generates the phrases described by a request.
	pub fn generate(&mut self, corpus: &Corpus, request: &GenerationRequest) -> Vec<String> {
		self.generate_phrases(corpus, request.order(), request.num_phrases(), request.difficulty())
	}

	/// Generates `num_phrases` phrases from the `difficulty` section with an
	/// n-gram model of order `n`.
	///
	/// # Behavior
	/// - Each phrase starts from a random known context and grows by sampling
	///   until it reaches a length drawn from the configured range.
	/// - Growth stops early if the last `n` tokens are all the same token.
	/// - Contexts may be reused across phrases.
	///
	/// # Returns
	/// The non-blank phrases, or an empty list when no model can be built
	/// (missing section, fewer than `n` tokens, unsupported `n`). Callers
	/// should treat an empty list as "corpus too small for this order".
	pub fn generate_phrases(&mut self, corpus: &Corpus, n: usize, num_phrases: usize, difficulty: Difficulty) -> Vec<String> {
		let model = match Self::cached_model(&mut self.cache, corpus, difficulty, n) {
			Ok(model) => model,
			Err(e) => {
				warn!("Cannot generate {} phrases with n={}: {}", difficulty, n, e);
				return Vec::new();
			}
		};

		let phrases: Vec<String> = (0..num_phrases)
			.filter_map(|_| Self::generate_phrase(model, &mut self.rng, &self.config))
			.filter(|phrase| !phrase.trim().is_empty())
			.collect();

		info!("Generated {} {} phrase(s) with n={}", phrases.len(), difficulty, n);
		phrases
	}

	/// Token counts of the `difficulty` section and of its order-`n` model.
	pub fn model_stats(&mut self, corpus: &Corpus, n: usize, difficulty: Difficulty) -> ModelStats {
		let tokens = normalize(&corpus.text(difficulty));
		let unique_words = tokens.iter().collect::<HashSet<_>>().len();
		let vocabulary_size = match Self::cached_model(&mut self.cache, corpus, difficulty, n) {
			Ok(model) => model.vocabulary().len(),
			Err(e) => {
				debug!("No model for {} stats: {}", difficulty, e);
				0
			}
		};

		ModelStats {
			total_tokens: tokens.len(),
			unique_words,
			vocabulary_size,
		}
	}

	/// Returns the model of a section, building it when the cache has no
	/// entry for the current section text.
	fn cached_model<'a>(
		cache: &'a mut HashMap<(Difficulty, usize), CachedModel>,
		corpus: &Corpus,
		difficulty: Difficulty,
		n: usize,
	) -> Result<&'a NGramModel> {
		NGramModel::check_order(n)?;
		if corpus.section(difficulty).is_none() {
			debug!("Corpus has no {} section", difficulty);
		}

		let text = corpus.text(difficulty);
		let fingerprint = Self::fingerprint(&text);

		let cached = match cache.entry((difficulty, n)) {
			Entry::Occupied(occupied) if occupied.get().fingerprint == fingerprint => occupied.into_mut(),
			entry => {
				let model = NGramModel::build(&normalize(&text), n)?;
				debug!(
					"Built {}-gram model for {} section: {} context(s), {} target(s)",
					n,
					difficulty,
					model.context_count(),
					model.vocabulary().len()
				);
				entry.insert_entry(CachedModel { fingerprint, model }).into_mut()
			}
		};
		Ok(&cached.model)
	}

	fn fingerprint(text: &str) -> u64 {
		let mut hasher = DefaultHasher::new();
		text.hash(&mut hasher);
		hasher.finish()
	}

	/// Samples a single phrase.
	///
	/// Returns `None` only if the model has no context to start from.
	fn generate_phrase(model: &NGramModel, rng: &mut R, config: &GeneratorConfig) -> Option<String> {
		let n = model.order();
		let max_len = config.max_phrase_len.max(config.min_phrase_len);
		let target_len = rng.random_range(config.min_phrase_len..=max_len).max(1);

		let mut phrase = model.random_context(rng)?;
		phrase.truncate(target_len);

		while phrase.len() < target_len {
			let context = &phrase[phrase.len().saturating_sub(n - 1)..];
			let Some(next) = model.sample_next(context, rng) else {
				break;
			};
			phrase.push(next);

			if Self::is_looping(&phrase, n) {
				break;
			}
		}

		Some(phrase.join(" "))
	}

	/// `true` when the last `n` tokens are all identical.
	fn is_looping(phrase: &[String], n: usize) -> bool {
		if phrase.len() < n {
			return false;
		}
		let tail = &phrase[phrase.len() - n..];
		tail.iter().all(|token| *token == tail[0])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::SectionText;
	use crate::tokenizer::vocabulary;

	const EASY: &str = "the cat sat on the mat the cat ran to the red hat and the dog sat on the log";

	fn corpus() -> Corpus {
		let mut corpus = Corpus::new();
		corpus.set_section(Difficulty::Easy, SectionText::Text(EASY.into()));
		corpus.set_section(
			Difficulty::Hard,
			SectionText::Lines(vec![
				"extraordinary circumstances require".into(),
				"meticulous preparation and unwavering determination".into(),
			]),
		);
		corpus
	}

	fn generator(seed: u64) -> PhraseGenerator {
		PhraseGenerator::seeded(GeneratorConfig::default(), seed)
	}

	#[test]
	fn phrases_stay_in_section_vocabulary() {
		let corpus = corpus();
		let allowed = vocabulary(EASY);
		let mut generator = generator(1);

		for n in 2..=5 {
			let phrases = generator.generate_phrases(&corpus, n, 10, Difficulty::Easy);
			assert_eq!(phrases.len(), 10);
			for phrase in &phrases {
				for token in normalize(phrase) {
					assert!(allowed.contains(&token), "{token} not in easy section");
				}
			}
		}
	}

	#[test]
	fn phrase_length_within_bounds() {
		let corpus = corpus();
		let mut generator = generator(5);
		for phrase in generator.generate_phrases(&corpus, 2, 50, Difficulty::Easy) {
			let len = phrase.split(' ').count();
			assert!((1..=12).contains(&len), "{phrase:?}");
		}
	}

	#[test]
	fn same_seed_same_phrases() {
		let corpus = corpus();
		let a = generator(77).generate_phrases(&corpus, 3, 8, Difficulty::Easy);
		let b = generator(77).generate_phrases(&corpus, 3, 8, Difficulty::Easy);
		assert_eq!(a, b);
	}

	#[test]
	fn sparse_sections_yield_nothing() {
		let mut corpus = corpus();
		corpus.set_section(Difficulty::Medium, SectionText::Text(String::new()));
		let mut generator = generator(2);

		assert!(generator.generate_phrases(&corpus, 2, 5, Difficulty::Medium).is_empty());
		// 8 tokens in the hard section
		assert!(generator.generate_phrases(&corpus, 5, 5, Difficulty::Hard).len() == 5);
		let tiny = {
			let mut c = Corpus::new();
			c.set_section(Difficulty::Hard, SectionText::Text("just three words".into()));
			c
		};
		assert!(generator.generate_phrases(&tiny, 4, 5, Difficulty::Hard).is_empty());
		assert!(generator.generate_phrases(&tiny, 9, 5, Difficulty::Hard).is_empty());
		assert!(generator.generate_phrases(&Corpus::new(), 2, 5, Difficulty::Easy).is_empty());
	}

	#[test]
	fn repeated_token_stops_growth() {
		let mut corpus = Corpus::new();
		corpus.set_section(Difficulty::Easy, SectionText::Text("go go go go go go".into()));
		let mut generator = generator(4);

		for phrase in generator.generate_phrases(&corpus, 2, 5, Difficulty::Easy) {
			assert_eq!(phrase, "go go");
		}
	}

	#[test]
	fn cache_follows_section_text() {
		let mut corpus = corpus();
		let mut generator = generator(8);

		generator.generate_phrases(&corpus, 2, 3, Difficulty::Easy);
		generator.generate_phrases(&corpus, 2, 3, Difficulty::Easy);
		assert_eq!(generator.cached_models(), 1);

		corpus.set_section(Difficulty::Easy, SectionText::Text("alpha beta gamma delta".into()));
		let allowed = vocabulary("alpha beta gamma delta");
		for phrase in generator.generate_phrases(&corpus, 2, 5, Difficulty::Easy) {
			assert!(normalize(&phrase).iter().all(|t| allowed.contains(t)), "{phrase:?}");
		}
		assert_eq!(generator.cached_models(), 1);

		generator.clear_cache();
		assert_eq!(generator.cached_models(), 0);
	}

	#[test]
	fn model_stats_count_tokens() {
		let corpus = corpus();
		let mut generator = generator(0);

		let stats = generator.model_stats(&corpus, 2, Difficulty::Easy);
		assert_eq!(stats.total_tokens, 20);
		assert_eq!(stats.unique_words, 12);
		assert!(stats.vocabulary_size > 0 && stats.vocabulary_size <= stats.unique_words);

		let empty = generator.model_stats(&corpus, 2, Difficulty::Medium);
		assert_eq!(empty, ModelStats::default());
	}

	#[test]
	fn request_presets_drive_generation() {
		let corpus = corpus();
		let mut generator = generator(12);
		let request = GenerationRequest::preset(Difficulty::Easy);
		assert_eq!(generator.generate(&corpus, &request).len(), 5);
	}
}
