// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::Type;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDescriptor {
	pub name: String,
	pub ty: Type,
	#[serde(default = "nullable_default")]
	pub nullable: bool,
}

fn nullable_default() -> bool {
	true
}

impl SlotDescriptor {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
			nullable: true,
		}
	}

	pub fn not_null(mut self) -> Self {
		self.nullable = false;
		self
	}
}

/// Ordered slot layout of a raw row or tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TupleDescriptor {
	pub slots: Vec<SlotDescriptor>,
}

impl TupleDescriptor {
	pub fn new(slots: Vec<SlotDescriptor>) -> Self {
		Self {
			slots,
		}
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.slots.iter().position(|slot| slot.name == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &SlotDescriptor> {
		self.slots.iter()
	}
}
