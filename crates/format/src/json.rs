// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use ingest_io::{ByteSource, StreamLoadPipe};
use ingest_type::{Error, RawRow, Result, ScratchPool, TupleDescriptor, Value};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::{LineSplitter, ReadStatus, ReaderOptions, RecordReader};

/// Decodes one JSON object per line.
///
/// Fields are matched to source slots by name. Missing fields and JSON
/// `null` leave the slot undefined; unknown fields are ignored.
pub struct JsonLinesReader<S> {
	lines: LineSplitter<S>,
}

impl<S: ByteSource> JsonLinesReader<S> {
	pub fn new(source: S, end: Option<u64>, options: &ReaderOptions) -> Self {
		Self {
			lines: LineSplitter::new(source, end, options.buffer_size),
		}
	}
}

impl<S: ByteSource> RecordReader for JsonLinesReader<S> {
	fn init(&mut self, schema: &TupleDescriptor) -> Result<()> {
		trace!(path = %self.lines.path(), slots = schema.len(), "json lines reader ready");
		Ok(())
	}

	fn read(&mut self, row: &mut RawRow, schema: &TupleDescriptor, _pool: &mut ScratchPool) -> Result<ReadStatus> {
		loop {
			let Some(line) = self.lines.next_line()? else {
				return Ok(ReadStatus::Eof);
			};
			if line.is_blank() {
				if line.last {
					return Ok(ReadStatus::Eof);
				}
				continue;
			}

			decode_json_row(line.bytes, schema, row, line.path, line.number)?;
			return Ok(if line.last {
				ReadStatus::LastRow
			} else {
				ReadStatus::Row
			});
		}
	}
}

/// The stream load pipe carries JSON lines and is read in place; binding a
/// streaming range never wraps the shared pipe.
impl RecordReader for Arc<StreamLoadPipe> {
	fn init(&mut self, _schema: &TupleDescriptor) -> Result<()> {
		Ok(())
	}

	fn read(&mut self, row: &mut RawRow, schema: &TupleDescriptor, _pool: &mut ScratchPool) -> Result<ReadStatus> {
		loop {
			let decoded = self.next_line(|bytes, number| {
				if bytes.iter().all(u8::is_ascii_whitespace) {
					None
				} else {
					Some(decode_json_row(bytes, schema, row, "stream load pipe", number))
				}
			})?;

			match decoded {
				None => return Ok(ReadStatus::Eof),
				Some(None) => continue,
				Some(Some(result)) => {
					result?;
					return Ok(ReadStatus::Row);
				}
			}
		}
	}
}

/// Decodes a JSON object into `row`, laid out by `schema`.
pub fn decode_json_row(bytes: &[u8], schema: &TupleDescriptor, row: &mut RawRow, path: &str, line: u64) -> Result<()> {
	let parsed: JsonValue = serde_json::from_slice(bytes).map_err(|err| Error::format(path, line, err))?;
	let JsonValue::Object(mut fields) = parsed else {
		return Err(Error::format(path, line, "expected a JSON object"));
	};

	row.reset(schema.len());
	for (idx, slot) in schema.iter().enumerate() {
		if let Some(field) = fields.remove(&slot.name) {
			row.set(idx, json_to_value(field));
		}
	}
	Ok(())
}

fn json_to_value(value: JsonValue) -> Value {
	match value {
		JsonValue::Null => Value::Undefined,
		JsonValue::Bool(b) => Value::Boolean(b),
		JsonValue::Number(n) => match n.as_i64() {
			Some(i) => Value::Int8(i),
			None => n.as_f64().map(Value::float8).unwrap_or(Value::Undefined),
		},
		JsonValue::String(s) => Value::Utf8(s),
		nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => Value::Utf8(nested.to_string()),
	}
}
