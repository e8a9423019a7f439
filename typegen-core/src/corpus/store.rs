use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{Corpus, Difficulty, SectionInfo, SectionText};
use crate::error::{Result, TypegenError};
use crate::io::{has_extension, read_file, write_atomic};

/// Encoding used for the corpus file, chosen from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorpusFormat {
	/// `.json`: human-editable
	Json,
	/// Anything else: compact `postcard` binary
	Binary,
}

impl CorpusFormat {
	pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
		if has_extension(path, "json") { CorpusFormat::Json } else { CorpusFormat::Binary }
	}

	fn encode(&self, corpus: &Corpus) -> Result<Vec<u8>> {
		Ok(match self {
			CorpusFormat::Json => serde_json::to_vec_pretty(corpus)?,
			CorpusFormat::Binary => postcard::to_stdvec(corpus)?,
		})
	}

	fn decode(&self, bytes: &[u8]) -> std::result::Result<Corpus, String> {
		match self {
			CorpusFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
			CorpusFormat::Binary => postcard::from_bytes(bytes).map_err(|e| e.to_string()),
		}
	}
}

/// Summary of the whole persisted corpus.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CorpusInfo {
	pub path: PathBuf,
	/// Sum of the section character counts
	pub total_size: usize,
	pub sections: BTreeMap<Difficulty, SectionInfo>,
}

/// File-backed corpus.
///
/// Every mutating operation reads the current file, applies the change and
/// writes the whole corpus back before returning. The store assumes a single
/// process and a single writer: there is no locking, and concurrent
/// mutation from several processes can lose updates.
#[derive(Clone, Debug)]
pub struct CorpusStore {
	path: PathBuf,
	format: CorpusFormat,
}

impl CorpusStore {
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		let path = path.as_ref().to_path_buf();
		let format = CorpusFormat::from_path(&path);
		Self { path, format }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn format(&self) -> CorpusFormat {
		self.format
	}

	pub fn exists(&self) -> bool {
		self.path.is_file()
	}

	/// Loads the corpus, surfacing a malformed file as `CorpusCorrupt`.
	///
	/// # Errors
	/// - `CorpusNotFound` if the file does not exist
	/// - `CorpusCorrupt` if it cannot be decoded as a section mapping
	/// - `FileAccess` if it exists but cannot be read
	pub fn load_strict(&self) -> Result<Corpus> {
		if !self.exists() {
			return Err(TypegenError::CorpusNotFound(self.path.clone()));
		}
		let bytes = std::fs::read(&self.path).map_err(|source| TypegenError::FileAccess {
			path: self.path.clone(),
			source,
		})?;
		self.format.decode(&bytes).map_err(|reason| TypegenError::CorpusCorrupt {
			path: self.path.clone(),
			reason,
		})
	}

	/// Loads the corpus.
	///
	/// A corrupt file is replaced by an empty corpus and a warning; only
	/// `CorpusNotFound` (and read failures) reach the caller.
	pub fn load(&self) -> Result<Corpus> {
		match self.load_strict() {
			Ok(corpus) => {
				debug!("Loaded corpus from {}", self.path.display());
				Ok(corpus)
			}
			Err(TypegenError::CorpusCorrupt { path, reason }) => {
				warn!("Corpus at {} is corrupt ({}), using an empty corpus", path.display(), reason);
				Ok(Corpus::default())
			}
			Err(e) => Err(e),
		}
	}

	/// Loads the corpus, starting from an empty one when no file exists yet.
	fn load_or_empty(&self) -> Result<Corpus> {
		match self.load() {
			Err(TypegenError::CorpusNotFound(path)) => {
				info!("No corpus at {}, starting a new one", path.display());
				Ok(Corpus::default())
			}
			other => other,
		}
	}

	/// Overwrites the persisted corpus atomically.
	pub fn save(&self, corpus: &Corpus) -> Result<()> {
		let bytes = self.format.encode(corpus)?;
		write_atomic(&self.path, &bytes).map_err(|source| TypegenError::FileAccess {
			path: self.path.clone(),
			source,
		})?;
		debug!("Saved corpus ({} bytes) to {}", bytes.len(), self.path.display());
		Ok(())
	}

	/// Word count, character count and sample of one persisted section.
	pub fn section_info(&self, difficulty: Difficulty) -> Result<SectionInfo> {
		Ok(self.load()?.section_info(difficulty))
	}

	/// Information on every section of the persisted corpus.
	pub fn corpus_info(&self) -> Result<CorpusInfo> {
		let corpus = self.load()?;
		let sections: BTreeMap<Difficulty, SectionInfo> = corpus
			.sections()
			.map(|(difficulty, _)| (difficulty, corpus.section_info(difficulty)))
			.collect();
		Ok(CorpusInfo {
			path: self.path.clone(),
			total_size: sections.values().map(|s| s.char_count).sum(),
			sections,
		})
	}

	/// Builds a new corpus from text files and writes it.
	///
	/// Files of one difficulty are concatenated in order, separated by a
	/// newline. Every file is attempted even after a failure so all
	/// unreadable files get reported; if any failed, nothing is written.
	///
	/// Returns `true` when the corpus was written.
	pub fn create_from_files(&self, assignments: &BTreeMap<Difficulty, Vec<PathBuf>>) -> bool {
		let mut corpus = Corpus::default();
		let mut failed = false;

		for (difficulty, files) in assignments {
			let mut parts: Vec<String> = Vec::with_capacity(files.len());
			for file in files {
				match read_file(file) {
					Ok(content) => {
						debug!("Read {} for {} section", file.display(), difficulty);
						parts.push(content);
					}
					Err(e) => {
						error!("Failed to read {} for {} section: {}", file.display(), difficulty, e);
						failed = true;
					}
				}
			}
			corpus.set_section(*difficulty, SectionText::Text(parts.join("\n")));
		}

		if failed {
			warn!("Corpus not written to {}: some files could not be read", self.path.display());
			return false;
		}

		match self.save(&corpus) {
			Ok(()) => {
				info!("Corpus created at {} with {} section(s)", self.path.display(), assignments.len());
				true
			}
			Err(e) => {
				error!("{}", e);
				false
			}
		}
	}

	/// Replaces the text of one section and persists the corpus.
	pub fn update_section(&self, difficulty: Difficulty, new_text: &str) -> Result<()> {
		Self::check_text(new_text)?;
		let mut corpus = self.load_or_empty()?;
		corpus.set_section(difficulty, SectionText::Text(new_text.to_owned()));
		self.save(&corpus)?;
		info!("Updated {} section", difficulty);
		Ok(())
	}

	/// Appends text to one section and persists the corpus.
	pub fn append_section(&self, difficulty: Difficulty, additional_text: &str) -> Result<()> {
		Self::check_text(additional_text)?;
		let mut corpus = self.load_or_empty()?;
		corpus.append_section(difficulty, additional_text);
		self.save(&corpus)?;
		info!("Appended {} character(s) to {} section", additional_text.chars().count(), difficulty);
		Ok(())
	}

	fn check_text(text: &str) -> Result<()> {
		if text.trim().is_empty() {
			return Err(TypegenError::InvalidParameter("No text provided".to_owned()));
		}
		Ok(())
	}
}
