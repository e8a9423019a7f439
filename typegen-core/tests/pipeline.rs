//! End-to-end tests: files on disk → corpus store → generator → analyzer.

use std::collections::BTreeMap;
use std::path::Path;

use typegen_core::analysis::{difficulty_stats, verify_integrity};
use typegen_core::config::GeneratorConfig;
use typegen_core::model::generation_request::GenerationRequest;
use typegen_core::tokenizer::{normalize, vocabulary};
use typegen_core::{CorpusStore, Difficulty, PhraseGenerator, TypegenError};

const EASY: &str = "The cat sat on the mat. The dog ran to the sun, and the cat ran too.\n\
	A big red hat is on the bed. The sun is hot and the day is long.";
const MEDIUM: &str = "Garden windows reflect golden morning light across quiet streets.\n\
	Curious travellers and locals gather around friendly market stalls before sunset.";
const HARD: &str = "Extraordinary circumstances occasionally necessitate meticulous \
	preparation, unwavering determination, and considerable perseverance \u{2014} \
	particularly when institutional bureaucracy complicates straightforward objectives.";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, content).unwrap();
	path
}

fn build_store(dir: &Path, file: &str) -> CorpusStore {
	let store = CorpusStore::new(dir.join(file));
	let assignments = BTreeMap::from([
		(Difficulty::Easy, vec![write(dir, "easy.txt", EASY)]),
		(Difficulty::Medium, vec![write(dir, "medium.txt", MEDIUM)]),
		(Difficulty::Hard, vec![write(dir, "hard.txt", HARD)]),
	]);
	assert!(store.create_from_files(&assignments));
	store
}

#[test]
fn generated_phrases_use_only_section_words() {
	let dir = tempfile::tempdir().unwrap();
	let store = build_store(dir.path(), "corpora.bin");
	let corpus = store.load().unwrap();
	let mut generator = PhraseGenerator::seeded(GeneratorConfig::default(), 2024);

	for difficulty in Difficulty::ALL {
		let request = GenerationRequest::preset(difficulty);
		let phrases = generator.generate(&corpus, &request);
		assert_eq!(phrases.len(), request.num_phrases(), "{difficulty}");

		let allowed = vocabulary(&corpus.text(difficulty));
		for phrase in &phrases {
			assert!(!phrase.trim().is_empty());
			for token in normalize(phrase) {
				assert!(allowed.contains(&token), "{token} leaked into {difficulty}");
			}
		}
	}
}

#[test]
fn integrity_report_is_consistent() {
	let dir = tempfile::tempdir().unwrap();
	let store = build_store(dir.path(), "corpora.json");
	let corpus = store.load().unwrap();
	let mut generator = PhraseGenerator::seeded(GeneratorConfig::default(), 7);

	let report = verify_integrity(&corpus, &mut generator);
	assert!(report.is_consistent());
	assert!(report.generation.values().all(|check| check.phrases == 6));

	// "and" appears in every section
	for overlap in &report.overlaps {
		assert!(overlap.shared.contains("and"), "{:?}", overlap);
	}
}

#[test]
fn edits_reach_the_next_generation() {
	let dir = tempfile::tempdir().unwrap();
	let store = build_store(dir.path(), "corpora.json");
	let mut generator = PhraseGenerator::seeded(GeneratorConfig::default(), 1);

	let before = store.load().unwrap();
	assert!(!generator.generate_phrases(&before, 2, 5, Difficulty::Easy).is_empty());

	store.update_section(Difficulty::Easy, "alpha beta gamma").unwrap();
	let after = store.load().unwrap();
	let allowed = vocabulary("alpha beta gamma");
	for phrase in generator.generate_phrases(&after, 2, 5, Difficulty::Easy) {
		assert!(normalize(&phrase).iter().all(|t| allowed.contains(t)), "{phrase:?}");
	}

	// 3 tokens cannot form a 4-gram
	assert!(generator.generate_phrases(&after, 4, 5, Difficulty::Easy).is_empty());
}

#[test]
fn stats_reflect_section_content() {
	let dir = tempfile::tempdir().unwrap();
	let store = build_store(dir.path(), "corpora.bin");
	let corpus = store.load().unwrap();

	let easy = difficulty_stats(&corpus, Difficulty::Easy, 5);
	let hard = difficulty_stats(&corpus, Difficulty::Hard, 5);
	assert!(easy.easy.count > easy.hard.count);
	assert!(hard.hard.count > hard.easy.count);
	assert_eq!(easy.total(), vocabulary(EASY).len());

	let info = store.corpus_info().unwrap();
	assert_eq!(info.sections.len(), 3);
	assert_eq!(info.sections[&Difficulty::Hard].word_count, HARD.split_whitespace().count());
}

#[test]
fn corrupt_store_yields_empty_generation() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("corpora.bin");
	std::fs::write(&path, [0xff, 0xff, 0xff, 0xff, 0xff]).unwrap();
	let store = CorpusStore::new(&path);

	assert!(matches!(store.load_strict(), Err(TypegenError::CorpusCorrupt { .. })));
	let corpus = store.load().unwrap();
	let mut generator = PhraseGenerator::seeded(GeneratorConfig::default(), 0);
	assert!(generator.generate_phrases(&corpus, 2, 5, Difficulty::Easy).is_empty());
}
