// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{Type, Value};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot cast '{value}' to {target}")]
pub struct CastError {
	pub value: String,
	pub target: Type,
}

impl Value {
	/// Coerces the value into `target`.
	///
	/// Undefined stays undefined. Text targeting a non-text type is trimmed
	/// first, and blank text becomes undefined.
	pub fn cast_to(&self, target: Type) -> Result<Value, CastError> {
		if self.get_type() == Some(target) {
			return Ok(self.clone());
		}

		let result = match (self, target) {
			(Value::Undefined, _) => Some(Value::Undefined),

			(Value::Boolean(v), Type::Int8) => Some(Value::Int8(*v as i64)),
			(Value::Boolean(v), Type::Float8) => Some(Value::Float8(if *v {
				1.0
			} else {
				0.0
			})),

			(Value::Int8(v), Type::Boolean) => match v {
				0 => Some(Value::Boolean(false)),
				1 => Some(Value::Boolean(true)),
				_ => None,
			},
			(Value::Int8(v), Type::Float8) => Some(Value::Float8(*v as f64)),

			(Value::Float8(v), Type::Int8) => float_to_int(*v).map(Value::Int8),
			(Value::Float8(_), Type::Boolean) => None,

			(Value::Utf8(text), target) => parse_text(text, target),

			(value, Type::Utf8) => Some(Value::Utf8(value.to_string())),

			_ => None,
		};

		result.ok_or_else(|| CastError {
			value: self.to_string(),
			target,
		})
	}
}

fn float_to_int(v: f64) -> Option<i64> {
	if v.fract() != 0.0 || v < i64::MIN as f64 || v >= i64::MAX as f64 {
		return None;
	}
	Some(v as i64)
}

fn parse_text(text: &str, target: Type) -> Option<Value> {
	if target == Type::Utf8 {
		return Some(Value::Utf8(text.to_string()));
	}

	let trimmed = text.trim();
	if trimmed.is_empty() {
		return Some(Value::Undefined);
	}

	match target {
		Type::Boolean => {
			if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
				Some(Value::Boolean(true))
			} else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
				Some(Value::Boolean(false))
			} else {
				None
			}
		}
		Type::Int8 => trimmed.parse::<i64>().ok().map(Value::Int8),
		Type::Float8 => trimmed.parse::<f64>().ok().filter(|v| v.is_finite()).map(Value::Float8),
		Type::Utf8 => unreachable!(),
	}
}
