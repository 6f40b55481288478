// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::Index;

use crate::{TupleDescriptor, Value};

/// Reusable buffer a record reader decodes one row into.
///
/// The buffer keeps its allocation across rows; readers call [`RawRow::reset`]
/// before filling it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
	values: Vec<Value>,
}

impl RawRow {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn for_schema(schema: &TupleDescriptor) -> Self {
		let mut row = Self::new();
		row.reset(schema.len());
		row
	}

	/// Clears the row to `len` undefined values.
	pub fn reset(&mut self, len: usize) {
		self.values.clear();
		self.values.resize(len, Value::Undefined);
	}

	pub fn set(&mut self, idx: usize, value: Value) {
		self.values[idx] = value;
	}

	pub fn get(&self, idx: usize) -> Option<&Value> {
		self.values.get(idx)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}
}

impl Index<usize> for RawRow {
	type Output = Value;

	fn index(&self, idx: usize) -> &Self::Output {
		&self.values[idx]
	}
}

/// A destination row, one value per destination slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuple {
	values: Vec<Value>,
}

impl Tuple {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_values(values: Vec<Value>) -> Self {
		Self {
			values,
		}
	}

	pub fn reset(&mut self, len: usize) {
		self.values.clear();
		self.values.resize(len, Value::Undefined);
	}

	pub fn set(&mut self, idx: usize, value: Value) {
		self.values[idx] = value;
	}

	pub fn get(&self, idx: usize) -> Option<&Value> {
		self.values.get(idx)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn into_values(self) -> Vec<Value> {
		self.values
	}
}

impl Index<usize> for Tuple {
	type Output = Value;

	fn index(&self, idx: usize) -> &Self::Output {
		&self.values[idx]
	}
}
