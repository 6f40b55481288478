// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ingest_io::ByteSource;
use ingest_type::{Error, FormatType, RangeDescriptor, Result};

use crate::{CsvReader, JsonLinesReader, ReaderOptions, RecordReader};

/// Builds the reader for a range over its opened source.
pub trait ReaderFactory: Send + Sync {
	fn create(
		&self,
		range: &RangeDescriptor,
		source: Box<dyn ByteSource>,
		options: &ReaderOptions,
	) -> Result<Box<dyn RecordReader>>;
}

/// Picks a reader by [`FormatType`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultReaderFactory;

impl ReaderFactory for DefaultReaderFactory {
	fn create(
		&self,
		range: &RangeDescriptor,
		source: Box<dyn ByteSource>,
		options: &ReaderOptions,
	) -> Result<Box<dyn RecordReader>> {
		let end = range.end_offset();
		match &range.format {
			FormatType::JsonLines => Ok(Box::new(JsonLinesReader::new(source, end, options))),
			FormatType::Csv => Ok(Box::new(CsvReader::new(source, end, options))),
			FormatType::Other(format) => Err(Error::UnsupportedFormat {
				format: format.clone(),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use ingest_io::LocalFileSource;
	use ingest_type::ErrorKind;

	use super::*;

	#[test]
	fn test_unknown_format_is_rejected() {
		let range = RangeDescriptor::local("/tmp/a.orc", FormatType::from("orc"));
		let source = Box::new(LocalFileSource::new(&range.path, 0));
		let err = DefaultReaderFactory.create(&range, source, &ReaderOptions::default()).err().unwrap();
		assert_eq!(err.kind(), ErrorKind::Configuration);
		assert_eq!(err.to_string(), "unsupported format: orc");
	}
}
