// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fs, path::Path};

use ingest_format::{JsonLinesReader, ReaderOptions, RecordReader, decode_json_row};
use ingest_io::{ByteSource, LocalFileSource};
use ingest_testing::init_tracing;
use ingest_type::{RawRow, ScratchPool, SlotDescriptor, TupleDescriptor, Type, Value};
use test_each_file::test_each_path;

test_each_path! { in "crates/format/tests/jsonl" as whole_file => test_whole_file }
test_each_path! { in "crates/format/tests/jsonl" as split_at_every_offset => test_split_at_every_offset }

fn schema() -> TupleDescriptor {
	TupleDescriptor::new(vec![
		SlotDescriptor::new("id", Type::Int8),
		SlotDescriptor::new("name", Type::Utf8),
		SlotDescriptor::new("score", Type::Float8),
		SlotDescriptor::new("active", Type::Boolean),
	])
}

fn expected_rows(path: &Path) -> Vec<Vec<Value>> {
	let contents = fs::read_to_string(path).unwrap();
	let schema = schema();
	contents
		.split('\n')
		.map(|line| line.trim_end_matches('\r'))
		.filter(|line| !line.trim().is_empty())
		.map(|line| {
			let mut row = RawRow::new();
			decode_json_row(line.as_bytes(), &schema, &mut row, "expected", 0).unwrap();
			row.values().to_vec()
		})
		.collect()
}

fn read_range(path: &Path, start: u64, end: Option<u64>) -> Vec<Vec<Value>> {
	let mut source = LocalFileSource::new(path.to_string_lossy(), start);
	source.open().unwrap();

	let options = ReaderOptions {
		buffer_size: 7,
		..Default::default()
	};
	let mut reader = JsonLinesReader::new(source, end, &options);
	let schema = schema();
	reader.init(&schema).unwrap();

	let mut rows = Vec::new();
	let mut row = RawRow::new();
	let mut pool = ScratchPool::new();
	loop {
		let status = reader.read(&mut row, &schema, &mut pool).unwrap();
		if status.has_row() {
			rows.push(row.values().to_vec());
		}
		if status.is_range_eof() {
			break;
		}
	}
	rows
}

fn test_whole_file(path: &Path) {
	init_tracing();
	assert_eq!(read_range(path, 0, None), expected_rows(path));
}

fn test_split_at_every_offset(path: &Path) {
	init_tracing();
	let expected = expected_rows(path);
	let len = fs::metadata(path).unwrap().len();

	for boundary in 1..len {
		let mut rows = read_range(path, 0, Some(boundary));
		rows.extend(read_range(path, boundary, None));
		assert_eq!(rows, expected, "split at {boundary} of {}", path.display());
	}
}
