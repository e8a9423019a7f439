//! Text normalization shared by the generator and the analyzer.
//!
//! Every vocabulary membership check in the crate goes through
//! [`normalize`], so a token produced by the model and a token read back
//! from a generated phrase always compare equal.

use std::collections::BTreeSet;

/// Dash and underscore variants treated as word separators.
const SEPARATORS: [char; 4] = ['-', '\u{2013}', '\u{2014}', '_'];

/// Collapses whitespace runs to a single space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces each run of dash/underscore variants with a single space.
pub fn replace_separators(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut in_run = false;
	for c in text.chars() {
		if SEPARATORS.contains(&c) {
			if !in_run {
				out.push(' ');
			}
			in_run = true;
		} else {
			out.push(c);
			in_run = false;
		}
	}
	out
}

/// Drops every character that is not an ASCII letter, ASCII digit or whitespace.
pub fn strip_symbols(text: &str) -> String {
	text.chars()
		.filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
		.collect()
}

/// Applies the character-level steps (whitespace, separators, symbols, case)
/// without splitting.
pub fn clean(text: &str) -> String {
	let text = collapse_whitespace(text);
	let text = replace_separators(&text);
	let text = strip_symbols(&text);
	text.to_ascii_lowercase()
}

/// Cleans a single vocabulary item, keeping it whole.
///
/// Internal spaces left by separators are collapsed, so `"Well-Known"` and
/// `"well known"` compare equal.
pub fn normalize_word(word: &str) -> String {
	collapse_whitespace(&clean(word))
}

/// Splits raw text into lowercase word tokens.
///
/// Empty tokens produced by adjacent separators are dropped.
pub fn normalize(text: &str) -> Vec<String> {
	clean(text).split_whitespace().map(str::to_owned).collect()
}

/// Returns the set of distinct normalized tokens in `text`.
pub fn vocabulary(text: &str) -> BTreeSet<String> {
	normalize(text).into_iter().collect()
}
