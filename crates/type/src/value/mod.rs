// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

mod cast;
mod r#type;

pub use cast::CastError;
pub use r#type::Type;

/// A cell of a raw row or tuple, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point
	Float8(f64),
	/// A UTF-8 encoded text.
	Utf8(String),
}

impl Value {
	/// NaN and infinities have no place in a loaded row and become undefined.
	pub fn float8(v: impl Into<f64>) -> Self {
		let v = v.into();
		if v.is_finite() {
			Value::Float8(v)
		} else {
			Value::Undefined
		}
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// The type of the value, `None` for [`Value::Undefined`].
	pub fn get_type(&self) -> Option<Type> {
		match self {
			Value::Undefined => None,
			Value::Boolean(_) => Some(Type::Boolean),
			Value::Int8(_) => Some(Type::Int8),
			Value::Float8(_) => Some(Type::Float8),
			Value::Utf8(_) => Some(Type::Utf8),
		}
	}
}

impl Default for Value {
	fn default() -> Self {
		Value::Undefined
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Boolean(v) => Display::fmt(v, f),
			Value::Int8(v) => Display::fmt(v, f),
			Value::Float8(v) => Display::fmt(v, f),
			Value::Utf8(v) => f.write_str(v),
		}
	}
}
