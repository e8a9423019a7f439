use std::path::PathBuf;

use thiserror::Error;

/// Every failure the core can report.
///
/// Only a few of these ever reach a caller as an error: `CorpusCorrupt` is
/// recovered inside `CorpusStore::load`, and `InsufficientCorpus` becomes an
/// empty phrase list in the generator.
#[derive(Error, Debug)]
pub enum TypegenError {
	#[error("Corpus not found: {}", .0.display())]
	CorpusNotFound(PathBuf),

	#[error("Corpus at {} is corrupt: {reason}", path.display())]
	CorpusCorrupt { path: PathBuf, reason: String },

	#[error("Insufficient corpus: {tokens} token(s) cannot form a {n}-gram")]
	InsufficientCorpus { tokens: usize, n: usize },

	#[error("N-gram order must be between 2 and 5, got {0}")]
	InvalidOrder(usize),

	#[error("Failed to access {}: {source}", path.display())]
	FileAccess {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Unknown difficulty: {0}")]
	UnknownDifficulty(String),

	#[error("Invalid parameter: {0}")]
	InvalidParameter(String),

	#[error("Configuration Error: {0}")]
	Config(String),

	#[error("IO Error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON Parsing Error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Binary Encoding Error: {0}")]
	Postcard(#[from] postcard::Error),
}

pub type Result<T> = std::result::Result<T, TypegenError>;
