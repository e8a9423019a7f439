use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TypegenError};
use crate::model::ngram_model::NGramModel;

/// Tunables of the generator and the analyzer.
///
/// Missing fields in a config file fall back to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
	/// Shortest phrase, in tokens
	pub min_phrase_len: usize,
	/// Longest phrase, in tokens
	pub max_phrase_len: usize,
	/// Sample words kept per class in difficulty statistics
	pub sample_size: usize,
	/// Order used by the integrity check's sample generation
	pub verify_order: usize,
	/// Phrases generated per section by the integrity check
	pub verify_phrases: usize,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			min_phrase_len: 6,
			max_phrase_len: 12,
			sample_size: 5,
			verify_order: 3,
			verify_phrases: 6,
		}
	}
}

impl GeneratorConfig {
	/// Reads a JSON config file and validates it.
	pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let content = fs::read_to_string(path).map_err(|source| TypegenError::FileAccess {
			path: path.to_path_buf(),
			source,
		})?;
		let config: Self = serde_json::from_str(&content)?;
		config.validate()?;
		info!("Loaded generator config from {}", path.display());
		Ok(config)
	}

	/// # Errors
	/// Returns `Config` when the phrase length range is empty or starts at 0,
	/// and `InvalidOrder` for an unsupported verification order.
	pub fn validate(&self) -> Result<()> {
		if self.min_phrase_len == 0 {
			return Err(TypegenError::Config("min_phrase_len must be >= 1".to_owned()));
		}
		if self.min_phrase_len > self.max_phrase_len {
			return Err(TypegenError::Config(format!(
				"min_phrase_len ({}) is greater than max_phrase_len ({})",
				self.min_phrase_len, self.max_phrase_len
			)));
		}
		NGramModel::check_order(self.verify_order)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = GeneratorConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!((config.min_phrase_len, config.max_phrase_len), (6, 12));
	}

	#[test]
	fn partial_file_keeps_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		fs::write(&path, r#"{ "max_phrase_len": 20 }"#).unwrap();

		let config = GeneratorConfig::load_from_file(&path).unwrap();
		assert_eq!(config.max_phrase_len, 20);
		assert_eq!(config.min_phrase_len, 6);
	}

	#[test]
	fn invalid_range_is_rejected() {
		let config = GeneratorConfig { min_phrase_len: 8, max_phrase_len: 4, ..Default::default() };
		assert!(matches!(config.validate(), Err(TypegenError::Config(_))));

		let config = GeneratorConfig { min_phrase_len: 0, ..Default::default() };
		assert!(config.validate().is_err());

		let config = GeneratorConfig { verify_order: 7, ..Default::default() };
		assert!(matches!(config.validate(), Err(TypegenError::InvalidOrder(7))));
	}

	#[test]
	fn missing_file_is_file_access() {
		let result = GeneratorConfig::load_from_file("/definitely/not/here.json");
		assert!(matches!(result, Err(TypegenError::FileAccess { .. })));
	}
}
