// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ingest_type::RangeDescriptor;

/// The ranges of a scan in processing order, plus the cursor of the next
/// range to open. The cursor never moves backwards.
#[derive(Debug, Clone)]
pub struct ScanSequence {
	ranges: Vec<RangeDescriptor>,
	cursor: usize,
}

impl ScanSequence {
	pub fn new(ranges: Vec<RangeDescriptor>) -> Self {
		Self {
			ranges,
			cursor: 0,
		}
	}

	/// The range the cursor points at, `None` once exhausted.
	pub fn peek(&self) -> Option<&RangeDescriptor> {
		self.ranges.get(self.cursor)
	}

	pub fn advance(&mut self) {
		if self.cursor < self.ranges.len() {
			self.cursor += 1;
		}
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}

	pub fn is_exhausted(&self) -> bool {
		self.cursor >= self.ranges.len()
	}
}
