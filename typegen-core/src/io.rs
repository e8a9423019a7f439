use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Reads a text file fully into memory.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Builds the sibling temporary path used while a file is being replaced.
///
/// Example:
/// `corpora/corpora.bin` → `corpora/.corpora.bin.tmp`
pub(crate) fn build_temp_path<P: AsRef<Path>>(target: P) -> io::Result<PathBuf> {
	let target = target.as_ref();

	let parent = target.parent().unwrap_or_else(|| Path::new("."));
	let file_name = target
		.file_name()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Target path has no filename"))?;

	let mut temp_name = std::ffi::OsString::from(".");
	temp_name.push(file_name);
	temp_name.push(".tmp");

	Ok(parent.join(temp_name))
}

/// Replaces `target` with `bytes` without ever leaving a half-written file.
///
/// - Writes and syncs a temporary sibling file
/// - Renames it over the target (atomic on the same filesystem)
/// - Creates the parent directory when missing
pub(crate) fn write_atomic<P: AsRef<Path>>(target: P, bytes: &[u8]) -> io::Result<()> {
	let target = target.as_ref();
	if let Some(parent) = target.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}

	let temp_path = build_temp_path(target)?;
	{
		let mut file = File::create(&temp_path)?;
		file.write_all(bytes)?;
		file.sync_all()?;
	}

	if let Err(e) = fs::rename(&temp_path, target) {
		let _ = fs::remove_file(&temp_path);
		return Err(e);
	}
	Ok(())
}

/// Returns `true` when the path carries the given extension (case-insensitive).
pub(crate) fn has_extension<P: AsRef<Path>>(path: P, extension: &str) -> bool {
	path.as_ref()
		.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
