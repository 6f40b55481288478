// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ingest_type::{Error, Result};

/// Knobs shared by the built-in readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
	/// Field separator of delimited text.
	pub column_separator: u8,
	/// Field content of delimited text that stands for null.
	pub null_marker: String,
	/// Bytes requested from the source per read.
	pub buffer_size: usize,
}

impl Default for ReaderOptions {
	fn default() -> Self {
		Self {
			column_separator: b'\t',
			null_marker: "\\N".to_string(),
			buffer_size: 64 * 1024,
		}
	}
}

impl ReaderOptions {
	pub fn validate(&self) -> Result<()> {
		if !self.column_separator.is_ascii() || self.column_separator == b'\n' {
			return Err(Error::config(format!("invalid column separator 0x{:02x}", self.column_separator)));
		}
		if self.buffer_size == 0 {
			return Err(Error::config("reader buffer size must be positive"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_are_valid() {
		ReaderOptions::default().validate().unwrap();
	}

	#[test]
	fn test_rejects_newline_separator() {
		let options = ReaderOptions {
			column_separator: b'\n',
			..Default::default()
		};
		assert!(options.validate().is_err());
	}
}
