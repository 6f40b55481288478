// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a stream load session.
///
/// A streaming range names the pipe it reads from by the load id under which
/// the producer registered that pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(pub Uuid);

impl LoadId {
	pub fn generate() -> Self {
		Self(Uuid::now_v7())
	}

	pub fn nil() -> Self {
		Self(Uuid::nil())
	}
}

impl Display for LoadId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl From<Uuid> for LoadId {
	fn from(value: Uuid) -> Self {
		Self(value)
	}
}

/// How the bytes of a range are reached.
///
/// Kinds the scanner does not know are kept verbatim in [`TransportKind::Other`]
/// so they can be reported when the range is bound instead of being lost while
/// the scan request is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportKind {
	Local,
	Broker,
	Stream,
	Other(String),
}

impl TransportKind {
	pub fn as_str(&self) -> &str {
		match self {
			TransportKind::Local => "local",
			TransportKind::Broker => "broker",
			TransportKind::Stream => "stream",
			TransportKind::Other(kind) => kind.as_str(),
		}
	}
}

impl From<&str> for TransportKind {
	fn from(value: &str) -> Self {
		match value.to_ascii_lowercase().as_str() {
			"local" => TransportKind::Local,
			"broker" => TransportKind::Broker,
			"stream" => TransportKind::Stream,
			_ => TransportKind::Other(value.to_string()),
		}
	}
}

impl From<String> for TransportKind {
	fn from(value: String) -> Self {
		TransportKind::from(value.as_str())
	}
}

impl From<TransportKind> for String {
	fn from(value: TransportKind) -> Self {
		value.as_str().to_string()
	}
}

impl Display for TransportKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Row encoding of the bytes in a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormatType {
	/// One JSON object per line.
	JsonLines,
	/// Delimited text, one record per line.
	Csv,
	Other(String),
}

impl FormatType {
	pub fn as_str(&self) -> &str {
		match self {
			FormatType::JsonLines => "jsonl",
			FormatType::Csv => "csv",
			FormatType::Other(format) => format.as_str(),
		}
	}
}

impl From<&str> for FormatType {
	fn from(value: &str) -> Self {
		match value.to_ascii_lowercase().as_str() {
			"jsonl" | "json_lines" | "ndjson" => FormatType::JsonLines,
			"csv" | "csv_plain" => FormatType::Csv,
			_ => FormatType::Other(value.to_string()),
		}
	}
}

impl From<String> for FormatType {
	fn from(value: String) -> Self {
		FormatType::from(value.as_str())
	}
}

impl From<FormatType> for String {
	fn from(value: FormatType) -> Self {
		value.as_str().to_string()
	}
}

impl Display for FormatType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Default for FormatType {
	fn default() -> Self {
		FormatType::JsonLines
	}
}

/// One unit of scan work.
///
/// `start_offset` and `size` describe a split of the file. Line oriented
/// readers own every line whose first byte lies in `(start_offset,
/// start_offset + size]`, plus the line at offset zero for the first split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDescriptor {
	pub file_type: TransportKind,
	#[serde(default)]
	pub format: FormatType,
	#[serde(default)]
	pub path: String,
	#[serde(default)]
	pub start_offset: u64,
	#[serde(default)]
	pub size: Option<u64>,
	#[serde(default)]
	pub load_id: Option<LoadId>,
}

impl RangeDescriptor {
	pub fn local(path: impl Into<String>, format: FormatType) -> Self {
		Self {
			file_type: TransportKind::Local,
			format,
			path: path.into(),
			start_offset: 0,
			size: None,
			load_id: None,
		}
	}

	pub fn broker(path: impl Into<String>, format: FormatType) -> Self {
		Self {
			file_type: TransportKind::Broker,
			format,
			path: path.into(),
			start_offset: 0,
			size: None,
			load_id: None,
		}
	}

	pub fn stream(load_id: LoadId) -> Self {
		Self {
			file_type: TransportKind::Stream,
			format: FormatType::JsonLines,
			path: format!("stream://{load_id}"),
			start_offset: 0,
			size: None,
			load_id: Some(load_id),
		}
	}

	pub fn with_split(mut self, start_offset: u64, size: u64) -> Self {
		self.start_offset = start_offset;
		self.size = Some(size);
		self
	}

	/// Offset of the last byte a line may start at to belong to this range.
	pub fn end_offset(&self) -> Option<u64> {
		self.size.map(|size| self.start_offset.saturating_add(size))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unknown_transport_is_preserved() {
		let range: RangeDescriptor =
			serde_json::from_str(r#"{"file_type": "hdfs", "path": "/warehouse/a.csv"}"#).unwrap();
		assert_eq!(range.file_type, TransportKind::Other("hdfs".to_string()));
		assert_eq!(range.format, FormatType::JsonLines);
		assert_eq!(range.file_type.to_string(), "hdfs");
	}

	#[test]
	fn test_known_kinds_decode_case_insensitively() {
		assert_eq!(TransportKind::from("LOCAL"), TransportKind::Local);
		assert_eq!(TransportKind::from("broker"), TransportKind::Broker);
		assert_eq!(TransportKind::from("Stream"), TransportKind::Stream);
		assert_eq!(FormatType::from("NDJSON"), FormatType::JsonLines);
		assert_eq!(FormatType::from("csv"), FormatType::Csv);
	}

	#[test]
	fn test_stream_range_round_trips_load_id() {
		let load_id = LoadId::generate();
		let range = RangeDescriptor::stream(load_id);
		let json = serde_json::to_string(&range).unwrap();
		let decoded: RangeDescriptor = serde_json::from_str(&json).unwrap();
		assert_eq!(decoded.load_id, Some(load_id));
		assert_eq!(decoded.file_type, TransportKind::Stream);
	}

	#[test]
	fn test_end_offset() {
		let range = RangeDescriptor::local("/tmp/a", FormatType::Csv).with_split(100, 50);
		assert_eq!(range.end_offset(), Some(150));
		assert_eq!(RangeDescriptor::local("/tmp/a", FormatType::Csv).end_offset(), None);
	}
}
