// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use uuid::Uuid;

/// Removes the directory when dropped, also while a failed assertion unwinds.
struct RemoveOnDrop(PathBuf);

impl Drop for RemoveOnDrop {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.0);
	}
}

pub fn temp_dir<F>(f: F) -> std::io::Result<()>
where
	F: FnOnce(&Path) -> std::io::Result<()>,
{
	let mut path = env::temp_dir();
	path.push(format!("ingest-{}", Uuid::new_v4()));

	fs::create_dir(&path)?;
	let guard = RemoveOnDrop(path);
	f(&guard.0)
}

/// Writes `contents` to `dir/name` and returns the path as a string, the way
/// scan ranges refer to files.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> std::io::Result<String> {
	let path: PathBuf = dir.join(name);
	fs::write(&path, contents)?;
	Ok(path.to_string_lossy().into_owned())
}

/// Renders one JSON line per row.
pub fn json_lines<'a>(rows: impl IntoIterator<Item = &'a str>) -> String {
	rows.into_iter().fold(String::new(), |mut out, row| {
		out.push_str(row);
		out.push('\n');
		out
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_directory_is_removed_afterwards() {
		let mut seen = PathBuf::new();
		temp_dir(|dir| {
			seen = dir.to_path_buf();
			let path = write_file(dir, "a.jsonl", &json_lines([r#"{"a":1}"#, r#"{"a":2}"#]))?;
			assert_eq!(fs::read_to_string(path)?, "{\"a\":1}\n{\"a\":2}\n");
			Ok(())
		})
		.unwrap();
		assert!(!seen.exists());
	}

	#[test]
	fn test_directory_is_removed_after_panic() {
		let mut seen = PathBuf::new();
		let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
			temp_dir(|dir| {
				seen = dir.to_path_buf();
				write_file(dir, "a.jsonl", "{}\n")?;
				panic!("assertion failed inside temp dir");
			})
		}));
		assert!(result.is_err());
		assert!(!seen.as_os_str().is_empty());
		assert!(!seen.exists());
	}
}
