// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Multi-range file scan.
//!
//! A [`FileScanner`] walks an ordered list of ranges, binding one reader at
//! a time, and produces one destination tuple per [`Scanner::get_next`]
//! call. Rows rejected by the [`RowMaterializer`] are skipped silently, also
//! across range boundaries, until a row is accepted or every range is used
//! up.
//!
//! ```text
//! get_next ─┬─ no reader / range used up ──► bind next range (release old one first)
//!           ├─ read one raw row ───────────► Eof: next range
//!           └─ materialize ────────────────► accepted: Tuple, rejected: read again
//! ```

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod binding;
mod config;
mod counter;
mod env;
mod materialize;
mod scanner;
mod sequence;

pub use binding::{Binding, ReaderSlot};
pub use config::{ScanParams, ScanRequest};
pub use counter::{CounterSnapshot, ScanCounters};
pub use env::ScanEnvironment;
use ingest_type::{Result, ScratchPool, Tuple};
pub use materialize::{RowMaterializer, SlotMaterializer};
pub use scanner::FileScanner;
pub use sequence::ScanSequence;

/// Result of a successful [`Scanner::get_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
	/// The tuple buffer holds a new row.
	Tuple,
	/// Every range is used up. Sticky: later calls return it again.
	EndOfScan,
}

/// Pull interface of a scan operator.
pub trait Scanner: Send {
	/// Validates the scan setup. Opens no range.
	fn open(&mut self) -> Result<()>;

	/// Blocks until one tuple is produced into `tuple` or the scan ends.
	///
	/// `pool` belongs to the caller and is never reset here.
	fn get_next(&mut self, tuple: &mut Tuple, pool: &mut ScratchPool) -> Result<Next>;

	/// Releases the bound reader, if any. Safe to call more than once.
	fn close(&mut self);
}
