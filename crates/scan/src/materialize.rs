// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ingest_type::{Error, RawRow, Result, ScratchPool, Tuple, TupleDescriptor, Value};
use tracing::debug;

use crate::ScanParams;

/// Turns raw rows into destination tuples.
pub trait RowMaterializer: Send {
	/// Resolves the destination layout against the source layout. Called
	/// once, when the scan is opened.
	fn prepare(&mut self, _src: &TupleDescriptor, _dest: &TupleDescriptor) -> Result<()> {
		Ok(())
	}

	/// Fills `tuple` from `raw`. Returns `false` when the row is rejected;
	/// the scanner then skips it and `tuple` holds nothing meaningful.
	fn materialize(&mut self, raw: &RawRow, tuple: &mut Tuple, pool: &mut ScratchPool) -> bool;
}

/// Maps destination slots to source slots by name and casts each value to
/// the destination type.
///
/// A row is rejected when a non-nullable slot would be null. In strict mode
/// a value that fails to cast also rejects the row; otherwise it is nulled.
pub struct SlotMaterializer {
	strict_mode: bool,
	max_error_rows: usize,
	dest: TupleDescriptor,
	/// Source index per destination slot.
	mapping: Vec<Option<usize>>,
	errors: Vec<String>,
	rejected: u64,
}

impl SlotMaterializer {
	pub fn new(strict_mode: bool, max_error_rows: usize) -> Self {
		Self {
			strict_mode,
			max_error_rows,
			dest: TupleDescriptor::default(),
			mapping: Vec::new(),
			errors: Vec::new(),
			rejected: 0,
		}
	}

	pub fn from_params(params: &ScanParams) -> Self {
		Self::new(params.strict_mode, params.max_error_rows)
	}

	/// The first `max_error_rows` rejection reasons.
	pub fn errors(&self) -> &[String] {
		&self.errors
	}

	pub fn rejected(&self) -> u64 {
		self.rejected
	}

	fn reject(&mut self, reason: String) -> bool {
		self.rejected += 1;
		debug!(reason = %reason, rejected = self.rejected, "row rejected");
		if self.errors.len() < self.max_error_rows {
			self.errors.push(reason);
		}
		false
	}
}

impl RowMaterializer for SlotMaterializer {
	fn prepare(&mut self, src: &TupleDescriptor, dest: &TupleDescriptor) -> Result<()> {
		let mut mapping = Vec::with_capacity(dest.len());
		for slot in dest.iter() {
			let idx = src.index_of(&slot.name);
			if idx.is_none() && !slot.nullable {
				return Err(Error::config(format!(
					"destination slot '{}' is not nullable and has no source slot",
					slot.name
				)));
			}
			mapping.push(idx);
		}

		self.dest = dest.clone();
		self.mapping = mapping;
		Ok(())
	}

	fn materialize(&mut self, raw: &RawRow, tuple: &mut Tuple, _pool: &mut ScratchPool) -> bool {
		tuple.reset(self.dest.len());

		for idx in 0..self.dest.len() {
			let slot = &self.dest.slots[idx];
			let value = match self.mapping[idx].and_then(|src| raw.get(src)) {
				None | Some(Value::Undefined) => Value::Undefined,
				Some(value) => match value.cast_to(slot.ty) {
					Ok(cast) => cast,
					Err(err) if self.strict_mode => {
						let reason = format!("slot '{}': {err}", slot.name);
						return self.reject(reason);
					}
					Err(_) => Value::Undefined,
				},
			};

			if value.is_undefined() && !slot.nullable {
				let reason = format!("slot '{}': null value for non-nullable slot", slot.name);
				return self.reject(reason);
			}
			tuple.set(idx, value);
		}

		true
	}
}
