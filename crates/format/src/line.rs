// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ingest_io::ByteSource;
use ingest_type::Result;

/// One line handed out by [`LineSplitter::next_line`].
#[derive(Debug)]
pub struct Line<'a> {
	/// Line content without `\n` or `\r\n`.
	pub bytes: &'a [u8],
	/// 1-based number of the line within the range.
	pub number: u64,
	/// No further line belongs to the range.
	pub last: bool,
	pub path: &'a str,
}

impl Line<'_> {
	pub fn is_blank(&self) -> bool {
		self.bytes.iter().all(u8::is_ascii_whitespace)
	}
}

/// Splits an opened byte source into the lines of one range.
///
/// A range starting past offset zero skips its first, partial line; the
/// previous range reads it. A line belongs to the range when its first byte
/// lies at or before the end offset, so the line straddling the boundary is
/// read by the earlier range only.
pub struct LineSplitter<S> {
	source: S,
	buf: Vec<u8>,
	pos: usize,
	len: usize,
	/// Absolute offset of `buf[pos]`.
	offset: u64,
	end: Option<u64>,
	line: Vec<u8>,
	line_no: u64,
	skip_first: bool,
	source_eof: bool,
	done: bool,
}

impl<S: ByteSource> LineSplitter<S> {
	pub fn new(source: S, end: Option<u64>, buffer_size: usize) -> Self {
		let offset = source.position();
		Self {
			source,
			buf: vec![0; buffer_size.max(1)],
			pos: 0,
			len: 0,
			offset,
			end,
			line: Vec::new(),
			line_no: 0,
			skip_first: offset > 0,
			source_eof: false,
			done: false,
		}
	}

	pub fn path(&self) -> &str {
		self.source.path()
	}

	pub fn lines_read(&self) -> u64 {
		self.line_no
	}

	pub fn next_line(&mut self) -> Result<Option<Line<'_>>> {
		if self.done {
			return Ok(None);
		}

		if self.skip_first {
			self.skip_first = false;
			if !self.fill_line()? {
				self.done = true;
				return Ok(None);
			}
		}

		if self.end.is_some_and(|end| self.offset > end) {
			self.done = true;
			return Ok(None);
		}

		if !self.fill_line()? {
			self.done = true;
			return Ok(None);
		}

		if self.line.last() == Some(&b'\r') {
			self.line.pop();
		}
		self.line_no += 1;

		let last = self.end.is_some_and(|end| self.offset > end);
		if last {
			self.done = true;
		}

		Ok(Some(Line {
			bytes: &self.line,
			number: self.line_no,
			last,
			path: self.source.path(),
		}))
	}

	/// Reads up to and including the next `\n` into `self.line`, leaving the
	/// terminator out. Returns `false` when the source has no bytes left.
	fn fill_line(&mut self) -> Result<bool> {
		self.line.clear();
		let mut consumed = false;

		loop {
			if self.pos < self.len {
				let avail = &self.buf[self.pos..self.len];
				if let Some(i) = avail.iter().position(|b| *b == b'\n') {
					self.line.extend_from_slice(&avail[..i]);
					self.pos += i + 1;
					self.offset += (i + 1) as u64;
					return Ok(true);
				}
				self.line.extend_from_slice(avail);
				self.offset += avail.len() as u64;
				self.pos = self.len;
				consumed = true;
			}

			if self.source_eof {
				return Ok(consumed);
			}

			let n = self.source.read(&mut self.buf)?;
			self.pos = 0;
			self.len = n;
			if n == 0 {
				self.source_eof = true;
			}
		}
	}
}
