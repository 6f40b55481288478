// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Record readers of the ingest scan path.
//!
//! A [`RecordReader`] decodes one row at a time from a byte source into a
//! reusable [`RawRow`]. Readers are created per range by a [`ReaderFactory`]
//! over an already opened source and own that source from then on.
//!
//! The stream load pipe needs no wrapping: `Arc<StreamLoadPipe>` is itself a
//! record reader decoding JSON lines, so a scanner binding a streaming range
//! only holds a handle to the shared pipe.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod csv;
mod factory;
mod json;
mod line;
mod options;

pub use csv::CsvReader;
pub use factory::{DefaultReaderFactory, ReaderFactory};
use ingest_type::{RawRow, Result, ScratchPool, TupleDescriptor};
pub use json::{JsonLinesReader, decode_json_row};
pub use line::{Line, LineSplitter};
pub use options::ReaderOptions;

/// Outcome of a single [`RecordReader::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
	/// A row was decoded; more may follow.
	Row,
	/// A row was decoded and it was the last one of the range.
	LastRow,
	/// No row was decoded; the range is exhausted.
	Eof,
}

impl ReadStatus {
	pub fn has_row(self) -> bool {
		!matches!(self, ReadStatus::Eof)
	}

	pub fn is_range_eof(self) -> bool {
		!matches!(self, ReadStatus::Row)
	}
}

/// Decodes the rows of one scan range.
pub trait RecordReader: Send {
	/// Prepares the reader for rows of `schema`, e.g. by validating a header.
	fn init(&mut self, schema: &TupleDescriptor) -> Result<()>;

	/// Decodes the next row into `row`, which is laid out by `schema`.
	fn read(&mut self, row: &mut RawRow, schema: &TupleDescriptor, pool: &mut ScratchPool) -> Result<ReadStatus>;
}

impl<R: RecordReader + ?Sized> RecordReader for Box<R> {
	fn init(&mut self, schema: &TupleDescriptor) -> Result<()> {
		(**self).init(schema)
	}

	fn read(&mut self, row: &mut RawRow, schema: &TupleDescriptor, pool: &mut ScratchPool) -> Result<ReadStatus> {
		(**self).read(row, schema, pool)
	}
}
