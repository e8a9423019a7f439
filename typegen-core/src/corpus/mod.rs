//! Difficulty-tiered corpus: sections, their text, and the on-disk store.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypegenError;

/// Persistence of the corpus (load, save, create, update, append).
pub mod store;

/// Number of characters kept in a section sample.
pub const SAMPLE_CHARS: usize = 100;

/// One of the three corpus partitions.
///
/// The same enum is reused by the analyzer for its length heuristic, but the
/// two classifications are unrelated: a word stored under `Easy` may be
/// classified `Hard`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
	#[serde(alias = "basic", alias = "simple", alias = "short")]
	Easy,
	#[serde(alias = "moderate")]
	Medium,
	#[serde(alias = "difficult", alias = "deep", alias = "long")]
	Hard,
}

impl Difficulty {
	pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

	pub fn as_str(&self) -> &'static str {
		match self {
			Difficulty::Easy => "easy",
			Difficulty::Medium => "medium",
			Difficulty::Hard => "hard",
		}
	}
}

impl fmt::Display for Difficulty {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.as_str())
	}
}

impl FromStr for Difficulty {
	type Err = TypegenError;

	/// Case-insensitive, accepts the legacy section aliases.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"easy" | "basic" | "simple" | "short" => Ok(Difficulty::Easy),
			"medium" | "moderate" => Ok(Difficulty::Medium),
			"hard" | "difficult" | "deep" | "long" => Ok(Difficulty::Hard),
			_ => Err(TypegenError::UnknownDifficulty(s.to_owned())),
		}
	}
}

/// Raw content of one section, as it was persisted.
///
/// Resolved once into plain text via [`SectionText::as_text`]; nothing past
/// the corpus boundary needs to know which variant was stored.
///
/// Human-readable formats store a section as a bare string or a list of
/// lines (`{"easy": "...", "hard": ["...", "..."]}`); the tagged form
/// `{"text": ...}` / `{"lines": [...]}` is also read. Binary formats always
/// use the tagged form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionText {
	Text(String),
	Lines(Vec<String>),
}

#[derive(Deserialize)]
#[serde(rename = "SectionText", rename_all = "snake_case")]
enum TaggedSection {
	Text(String),
	Lines(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlainSection {
	Text(String),
	Lines(Vec<String>),
	Tagged(TaggedSection),
}

impl From<TaggedSection> for SectionText {
	fn from(section: TaggedSection) -> Self {
		match section {
			TaggedSection::Text(text) => SectionText::Text(text),
			TaggedSection::Lines(lines) => SectionText::Lines(lines),
		}
	}
}

impl Serialize for SectionText {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match (self, serializer.is_human_readable()) {
			(SectionText::Text(text), true) => serializer.serialize_str(text),
			(SectionText::Lines(lines), true) => lines.serialize(serializer),
			(SectionText::Text(text), false) => serializer.serialize_newtype_variant("SectionText", 0, "text", text),
			(SectionText::Lines(lines), false) => serializer.serialize_newtype_variant("SectionText", 1, "lines", lines),
		}
	}
}

impl<'de> Deserialize<'de> for SectionText {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		if !deserializer.is_human_readable() {
			return TaggedSection::deserialize(deserializer).map(Into::into);
		}
		Ok(match PlainSection::deserialize(deserializer)? {
			PlainSection::Text(text) => SectionText::Text(text),
			PlainSection::Lines(lines) => SectionText::Lines(lines),
			PlainSection::Tagged(tagged) => tagged.into(),
		})
	}
}

impl SectionText {
	/// Returns the section as one string (lines joined with `\n`).
	pub fn as_text(&self) -> String {
		match self {
			SectionText::Text(text) => text.clone(),
			SectionText::Lines(lines) => lines.join("\n"),
		}
	}

	/// Appends `extra` on a new line (or as a new line for line lists).
	fn append(&mut self, extra: &str) {
		match self {
			SectionText::Text(text) => {
				if !text.is_empty() && !text.ends_with('\n') {
					text.push('\n');
				}
				text.push_str(extra);
			}
			SectionText::Lines(lines) => lines.extend(extra.lines().map(str::to_owned)),
		}
	}
}

impl Default for SectionText {
	fn default() -> Self {
		SectionText::Text(String::new())
	}
}

/// Size and preview of one section.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct SectionInfo {
	pub word_count: usize,
	pub char_count: usize,
	pub sample: String,
}

/// Mapping from difficulty to section text.
///
/// # Invariants
/// - At most one section per difficulty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Corpus {
	sections: BTreeMap<Difficulty, SectionText>,
}

impl Corpus {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}

	pub fn section(&self, difficulty: Difficulty) -> Option<&SectionText> {
		self.sections.get(&difficulty)
	}

	/// Returns the section text, or an empty string when the section is missing.
	pub fn text(&self, difficulty: Difficulty) -> String {
		self.section(difficulty).map(SectionText::as_text).unwrap_or_default()
	}

	pub fn sections(&self) -> impl Iterator<Item = (Difficulty, &SectionText)> {
		self.sections.iter().map(|(d, s)| (*d, s))
	}

	/// Replaces a section's content.
	pub fn set_section(&mut self, difficulty: Difficulty, text: SectionText) {
		self.sections.insert(difficulty, text);
	}

	/// Appends text to a section, creating it when missing.
	pub fn append_section(&mut self, difficulty: Difficulty, extra: &str) {
		self.sections.entry(difficulty).or_default().append(extra);
	}

	/// Word count, character count and a short preview of a section.
	pub fn section_info(&self, difficulty: Difficulty) -> SectionInfo {
		let text = self.text(difficulty);
		let char_count = text.chars().count();
		let mut sample: String = text.chars().take(SAMPLE_CHARS).collect();
		if char_count > SAMPLE_CHARS {
			sample.push_str("...");
		}
		SectionInfo {
			word_count: text.split_whitespace().count(),
			char_count,
			sample,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn difficulty_parses_aliases() {
		assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
		assert_eq!("short".parse::<Difficulty>().unwrap(), Difficulty::Easy);
		assert_eq!("moderate".parse::<Difficulty>().unwrap(), Difficulty::Medium);
		assert_eq!(" Deep ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
		assert!(matches!(
			"extreme".parse::<Difficulty>(),
			Err(TypegenError::UnknownDifficulty(_))
		));
	}

	#[test]
	fn display_honours_width() {
		assert_eq!(format!("[{:<7}]", Difficulty::Easy), "[easy   ]");
		assert_eq!(format!("[{:>6}]", Difficulty::Hard), "[  hard]");
	}

	#[test]
	fn json_sections_are_plain_values() {
		let mut corpus = Corpus::new();
		corpus.set_section(Difficulty::Easy, SectionText::Text("a b".into()));
		corpus.set_section(Difficulty::Hard, SectionText::Lines(vec!["x".into(), "y".into()]));

		let json = serde_json::to_string(&corpus).unwrap();
		assert_eq!(json, r#"{"easy":"a b","hard":["x","y"]}"#);
		assert_eq!(serde_json::from_str::<Corpus>(&json).unwrap(), corpus);
	}

	#[test]
	fn line_list_resolves_to_text() {
		let section = SectionText::Lines(vec!["alpha beta".into(), "gamma".into()]);
		assert_eq!(section.as_text(), "alpha beta\ngamma");
	}

	#[test]
	fn append_creates_and_extends() {
		let mut corpus = Corpus::new();
		corpus.append_section(Difficulty::Easy, "one two");
		corpus.append_section(Difficulty::Easy, "three");
		assert_eq!(corpus.text(Difficulty::Easy), "one two\nthree");

		corpus.set_section(Difficulty::Hard, SectionText::Lines(vec!["x".into()]));
		corpus.append_section(Difficulty::Hard, "y\nz");
		assert_eq!(
			corpus.section(Difficulty::Hard),
			Some(&SectionText::Lines(vec!["x".into(), "y".into(), "z".into()]))
		);
	}

	#[test]
	fn section_info_truncates_sample() {
		let mut corpus = Corpus::new();
		let long = "word ".repeat(40);
		corpus.set_section(Difficulty::Medium, SectionText::Text(long.clone()));

		let info = corpus.section_info(Difficulty::Medium);
		assert_eq!(info.word_count, 40);
		assert_eq!(info.char_count, long.len());
		assert_eq!(info.sample.chars().count(), SAMPLE_CHARS + 3);
		assert!(info.sample.ends_with("..."));
	}

	#[test]
	fn missing_section_is_empty() {
		let corpus = Corpus::new();
		assert_eq!(corpus.text(Difficulty::Hard), "");
		assert_eq!(corpus.section_info(Difficulty::Hard), SectionInfo::default());
	}
}
