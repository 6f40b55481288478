// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::str;

use bumpalo::collections::Vec as BumpVec;
use ingest_io::ByteSource;
use ingest_type::{Error, RawRow, Result, ScratchPool, TupleDescriptor, Value};
use tracing::trace;

use crate::{LineSplitter, ReadStatus, ReaderOptions, RecordReader};

/// Decodes delimited text, one record per line.
///
/// Fields map to source slots by position and every record must carry
/// exactly one field per slot. Fields are kept as text; typing them is left
/// to materialization. There is no quoting. Empty lines are skipped unless
/// the schema has a single slot, where an empty line is one empty field.
pub struct CsvReader<S> {
	lines: LineSplitter<S>,
	separator: u8,
	null_marker: String,
}

impl<S: ByteSource> CsvReader<S> {
	pub fn new(source: S, end: Option<u64>, options: &ReaderOptions) -> Self {
		Self {
			lines: LineSplitter::new(source, end, options.buffer_size),
			separator: options.column_separator,
			null_marker: options.null_marker.clone(),
		}
	}
}

impl<S: ByteSource> RecordReader for CsvReader<S> {
	fn init(&mut self, schema: &TupleDescriptor) -> Result<()> {
		if schema.is_empty() {
			return Err(Error::config(format!("no source slots for delimited file {}", self.lines.path())));
		}
		trace!(path = %self.lines.path(), slots = schema.len(), "csv reader ready");
		Ok(())
	}

	fn read(&mut self, row: &mut RawRow, schema: &TupleDescriptor, pool: &mut ScratchPool) -> Result<ReadStatus> {
		loop {
			let Some(line) = self.lines.next_line()? else {
				return Ok(ReadStatus::Eof);
			};
			if line.bytes.is_empty() && schema.len() > 1 {
				if line.last {
					return Ok(ReadStatus::Eof);
				}
				continue;
			}

			let mut fields = BumpVec::with_capacity_in(schema.len(), pool.bump());
			fields.extend(line.bytes.split(|b| *b == self.separator));
			if fields.len() != schema.len() {
				return Err(Error::format(
					line.path,
					line.number,
					format!("expected {} fields, found {}", schema.len(), fields.len()),
				));
			}

			row.reset(schema.len());
			for (idx, field) in fields.iter().enumerate() {
				if *field == self.null_marker.as_bytes() {
					continue;
				}
				let text = str::from_utf8(field).map_err(|err| Error::format(line.path, line.number, err))?;
				row.set(idx, Value::utf8(text));
			}

			return Ok(if line.last {
				ReadStatus::LastRow
			} else {
				ReadStatus::Row
			});
		}
	}
}
