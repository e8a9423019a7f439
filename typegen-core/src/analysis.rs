//! Diagnostics over a corpus: word complexity statistics, vocabulary
//! overlap between sections, and a check that generated phrases only use
//! words from the section they were generated from.
//!
//! The word classification here is a surface heuristic. It says nothing
//! about which section a word is stored in: "extraordinary" in the easy
//! section still counts as hard-like.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::corpus::{Corpus, Difficulty, SectionText};
use crate::model::generator::PhraseGenerator;
use crate::tokenizer::{normalize, normalize_word, vocabulary};

/// Words of at most this many characters are easy.
const EASY_MAX_LEN: usize = 4;
/// Words of at least this many characters are hard.
const HARD_MIN_LEN: usize = 10;
/// Words with at least this many syllables are hard.
const HARD_MIN_SYLLABLES: usize = 4;

/// Approximates the number of syllables as the number of vowel groups,
/// ignoring a silent final `e`.
pub fn count_syllables(word: &str) -> usize {
	let word = word.to_ascii_lowercase();
	let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

	let mut groups = 0;
	let mut previous_vowel = false;
	for c in word.chars().filter(char::is_ascii_alphabetic) {
		let vowel = is_vowel(c);
		if vowel && !previous_vowel {
			groups += 1;
		}
		previous_vowel = vowel;
	}

	if groups > 1 && word.ends_with('e') && !word.ends_with("le") && !word.ends_with("ee") {
		groups -= 1;
	}
	groups
}

/// Classifies a word by surface complexity.
///
/// - at most 4 characters: easy
/// - at least 10 characters, or at least 4 syllables: hard
/// - anything else: medium
pub fn classify_word(word: &str) -> Difficulty {
	let len = word.trim().chars().filter(char::is_ascii_alphanumeric).count();
	if len <= EASY_MAX_LEN {
		Difficulty::Easy
	} else if len >= HARD_MIN_LEN || count_syllables(word) >= HARD_MIN_SYLLABLES {
		Difficulty::Hard
	} else {
		Difficulty::Medium
	}
}

/// Count and examples of the words falling in one class.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct WordClass {
	pub count: usize,
	pub sample_words: Vec<String>,
}

/// Complexity breakdown of one section's vocabulary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct DifficultyStats {
	pub easy: WordClass,
	pub medium: WordClass,
	pub hard: WordClass,
}

impl DifficultyStats {
	pub fn get(&self, class: Difficulty) -> &WordClass {
		match class {
			Difficulty::Easy => &self.easy,
			Difficulty::Medium => &self.medium,
			Difficulty::Hard => &self.hard,
		}
	}

	fn get_mut(&mut self, class: Difficulty) -> &mut WordClass {
		match class {
			Difficulty::Easy => &mut self.easy,
			Difficulty::Medium => &mut self.medium,
			Difficulty::Hard => &mut self.hard,
		}
	}

	pub fn total(&self) -> usize {
		self.easy.count + self.medium.count + self.hard.count
	}
}

/// Classifies every distinct word of a section.
///
/// Words are visited in order of first appearance, so the samples are the
/// first `sample_size` words of each class. A missing section yields empty
/// statistics.
pub fn difficulty_stats(corpus: &Corpus, section: Difficulty, sample_size: usize) -> DifficultyStats {
	let mut stats = DifficultyStats::default();
	let mut seen: HashSet<String> = HashSet::new();

	for word in normalize(&corpus.text(section)) {
		if !seen.insert(word.clone()) {
			continue;
		}
		let class = stats.get_mut(classify_word(&word));
		class.count += 1;
		if class.sample_words.len() < sample_size {
			class.sample_words.push(word);
		}
	}
	stats
}

/// Words shared by two sections.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Overlap {
	pub first: Difficulty,
	pub second: Difficulty,
	pub shared: BTreeSet<String>,
}

/// Outcome of the sample generation for one section.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct GenerationCheck {
	/// Phrases produced (0 when the section is too small)
	pub phrases: usize,
	/// Generated tokens missing from the section vocabulary
	pub outside: BTreeSet<String>,
}

impl GenerationCheck {
	pub fn is_clean(&self) -> bool {
		self.outside.is_empty()
	}
}

/// Result of [`verify_integrity`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct IntegrityReport {
	/// Distinct normalized entries per section (see [`section_entries`])
	pub vocabulary_sizes: BTreeMap<Difficulty, usize>,
	/// One entry per pair of sections, informational only
	pub overlaps: Vec<Overlap>,
	pub generation: BTreeMap<Difficulty, GenerationCheck>,
}

impl IntegrityReport {
	/// `true` when no generated token escaped its section.
	pub fn is_consistent(&self) -> bool {
		self.generation.values().all(GenerationCheck::is_clean)
	}

	pub fn overlap(&self, a: Difficulty, b: Difficulty) -> Option<&Overlap> {
		self.overlaps
			.iter()
			.find(|o| (o.first == a && o.second == b) || (o.first == b && o.second == a))
	}
}

/// Distinct normalized entries of a section, as compared across sections.
///
/// A line-list section is a word list: each line is one entry, cleaned
/// with [`normalize_word`]. A text section contributes its tokens.
pub fn section_entries(section: Option<&SectionText>) -> BTreeSet<String> {
	match section {
		Some(SectionText::Lines(lines)) => lines
			.iter()
			.map(|line| normalize_word(line))
			.filter(|entry| !entry.is_empty())
			.collect(),
		Some(SectionText::Text(text)) => vocabulary(text),
		None => BTreeSet::new(),
	}
}

/// Checks vocabulary isolation between sections and within generation.
///
/// - Computes each pairwise intersection of section entries.
/// - Generates sample phrases for each section (order and count from the
///   generator config) and lists any token not in that section's
///   vocabulary. Such a token would mean the normalizer disagrees with
///   itself somewhere.
pub fn verify_integrity<R: Rng>(corpus: &Corpus, generator: &mut PhraseGenerator<R>) -> IntegrityReport {
	let entries: BTreeMap<Difficulty, BTreeSet<String>> = Difficulty::ALL
		.iter()
		.map(|&d| (d, section_entries(corpus.section(d))))
		.collect();

	let mut report = IntegrityReport {
		vocabulary_sizes: entries.iter().map(|(d, v)| (*d, v.len())).collect(),
		..Default::default()
	};

	for (i, first) in Difficulty::ALL.iter().enumerate() {
		for second in &Difficulty::ALL[i + 1..] {
			let shared: BTreeSet<String> = entries[first]
				.intersection(&entries[second])
				.cloned()
				.collect();
			if !shared.is_empty() {
				info!("{} and {} sections share {} word(s)", first, second, shared.len());
			}
			report.overlaps.push(Overlap { first: *first, second: *second, shared });
		}
	}

	let n = generator.config().verify_order;
	let num_phrases = generator.config().verify_phrases;
	for difficulty in Difficulty::ALL {
		let phrases = generator.generate_phrases(corpus, n, num_phrases, difficulty);
		let allowed = vocabulary(&corpus.text(difficulty));
		let outside: BTreeSet<String> = phrases
			.iter()
			.flat_map(|phrase| normalize(phrase))
			.filter(|token| !allowed.contains(token))
			.collect();
		if !outside.is_empty() {
			warn!("{} generated word(s) outside the {} section", outside.len(), difficulty);
		}
		report.generation.insert(difficulty, GenerationCheck { phrases: phrases.len(), outside });
	}

	report
}
