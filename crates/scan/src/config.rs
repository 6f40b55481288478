// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::{BTreeMap, HashSet};

use ingest_format::ReaderOptions;
use ingest_io::BrokerAddress;
use ingest_type::{Error, RangeDescriptor, Result, TupleDescriptor};
use serde::{Deserialize, Serialize};

/// Parameters shared by every range of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanParams {
	/// Layout of the rows the readers decode.
	pub src_slots: TupleDescriptor,
	/// Layout of the tuples handed to the caller.
	pub dest_slots: TupleDescriptor,
	/// Reject rows whose values fail to cast instead of nulling them.
	#[serde(default)]
	pub strict_mode: bool,
	/// Brokers tried in order when opening a broker range.
	#[serde(default)]
	pub broker_addresses: Vec<BrokerAddress>,
	/// Passed through to the broker on open.
	#[serde(default)]
	pub properties: BTreeMap<String, String>,
	#[serde(default = "default_column_separator")]
	pub column_separator: char,
	/// Rejection reasons kept for reporting; later ones are only logged.
	#[serde(default = "default_max_error_rows")]
	pub max_error_rows: usize,
}

fn default_column_separator() -> char {
	'\t'
}

fn default_max_error_rows() -> usize {
	20
}

impl ScanParams {
	pub fn new(src_slots: TupleDescriptor, dest_slots: TupleDescriptor) -> Self {
		Self {
			src_slots,
			dest_slots,
			strict_mode: false,
			broker_addresses: Vec::new(),
			properties: BTreeMap::new(),
			column_separator: default_column_separator(),
			max_error_rows: default_max_error_rows(),
		}
	}

	pub fn from_json(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(|err| Error::config(format!("invalid scan parameters: {err}")))
	}

	pub fn validate(&self) -> Result<()> {
		if self.src_slots.is_empty() {
			return Err(Error::config("scan has no source slots"));
		}
		if self.dest_slots.is_empty() {
			return Err(Error::config("scan has no destination slots"));
		}

		let mut seen = HashSet::new();
		for slot in self.src_slots.iter() {
			if !seen.insert(slot.name.as_str()) {
				return Err(Error::config(format!("duplicate source slot '{}'", slot.name)));
			}
		}

		self.reader_options()?.validate()
	}

	pub fn reader_options(&self) -> Result<ReaderOptions> {
		if !self.column_separator.is_ascii() {
			return Err(Error::config(format!("column separator {:?} is not ASCII", self.column_separator)));
		}
		Ok(ReaderOptions {
			column_separator: self.column_separator as u8,
			..ReaderOptions::default()
		})
	}
}

/// A whole scan as it arrives from the planner: parameters plus ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
	pub params: ScanParams,
	pub ranges: Vec<RangeDescriptor>,
}

impl ScanRequest {
	pub fn from_json(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(|err| Error::config(format!("invalid scan request: {err}")))
	}
}
