// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use bumpalo::Bump;

/// Caller-owned arena for allocations that only live while one row is decoded
/// or materialized.
///
/// The scanner never resets the pool; the caller resets it between batches
/// once it no longer needs anything allocated from it.
#[derive(Debug, Default)]
pub struct ScratchPool {
	bump: Bump,
}

impl ScratchPool {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bump(&self) -> &Bump {
		&self.bump
	}

	pub fn reset(&mut self) {
		self.bump.reset();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_reset_keeps_pool_usable() {
		let mut pool = ScratchPool::new();
		assert_eq!(pool.bump().alloc_str("abc"), "abc");
		assert!(pool.bump().allocated_bytes() > 0);
		pool.reset();
		assert_eq!(pool.bump().alloc_str("def"), "def");
	}
}
