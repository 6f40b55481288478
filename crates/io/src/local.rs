// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs::File,
	io::{Read, Seek, SeekFrom},
};

use ingest_type::{Error, Result, internal_error};
use tracing::trace;

use crate::ByteSource;

/// Reads a file on the local disk starting at a byte offset.
#[derive(Debug)]
pub struct LocalFileSource {
	path: String,
	start_offset: u64,
	position: u64,
	file: Option<File>,
}

impl LocalFileSource {
	pub fn new(path: impl Into<String>, start_offset: u64) -> Self {
		Self {
			path: path.into(),
			start_offset,
			position: start_offset,
			file: None,
		}
	}

	pub fn is_open(&self) -> bool {
		self.file.is_some()
	}
}

impl ByteSource for LocalFileSource {
	fn open(&mut self) -> Result<()> {
		let mut file = File::open(&self.path).map_err(|source| Error::Open {
			path: self.path.clone(),
			source,
		})?;

		if self.start_offset > 0 {
			file.seek(SeekFrom::Start(self.start_offset)).map_err(|source| Error::Open {
				path: self.path.clone(),
				source,
			})?;
		}

		trace!(path = %self.path, offset = self.start_offset, "opened local file");
		self.position = self.start_offset;
		self.file = Some(file);
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		let Some(file) = self.file.as_mut() else {
			return Err(internal_error!("read from unopened local file {}", self.path));
		};
		let n = file.read(buf)?;
		self.position += n as u64;
		Ok(n)
	}

	fn position(&self) -> u64 {
		self.position
	}

	fn path(&self) -> &str {
		&self.path
	}
}
