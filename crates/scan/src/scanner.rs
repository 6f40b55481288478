// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use ingest_format::ReaderOptions;
use ingest_type::{RangeDescriptor, RawRow, Result, ScratchPool, Tuple, internal_error};
use tracing::{debug, instrument, warn};

use crate::{
	Next, ReaderSlot, RowMaterializer, ScanCounters, ScanEnvironment, ScanParams, ScanRequest, ScanSequence,
	Scanner, SlotMaterializer,
};

/// Scans a list of ranges one after the other and hands out one tuple per
/// [`Scanner::get_next`].
///
/// At most one range is bound at a time. `range_eof` marks the bound range
/// as used up, `scanner_eof` marks the whole scan as finished; the latter
/// never resets.
pub struct FileScanner {
	params: ScanParams,
	env: ScanEnvironment,
	options: ReaderOptions,
	sequence: ScanSequence,
	slot: ReaderSlot,
	materializer: Box<dyn RowMaterializer>,
	raw: RawRow,
	counters: Arc<ScanCounters>,
	opened: bool,
	closed: bool,
	range_eof: bool,
	scanner_eof: bool,
}

impl FileScanner {
	pub fn new(
		params: ScanParams,
		ranges: Vec<RangeDescriptor>,
		env: ScanEnvironment,
		materializer: Box<dyn RowMaterializer>,
	) -> Self {
		Self {
			params,
			env,
			options: ReaderOptions::default(),
			sequence: ScanSequence::new(ranges),
			slot: ReaderSlot::new(),
			materializer,
			raw: RawRow::new(),
			counters: Arc::new(ScanCounters::default()),
			opened: false,
			closed: false,
			range_eof: false,
			scanner_eof: false,
		}
	}

	/// Builds a scanner materializing through a [`SlotMaterializer`].
	pub fn from_request(request: ScanRequest, env: ScanEnvironment) -> Self {
		let materializer = Box::new(SlotMaterializer::from_params(&request.params));
		Self::new(request.params, request.ranges, env, materializer)
	}

	pub fn counters(&self) -> &Arc<ScanCounters> {
		&self.counters
	}

	/// Index of the next range to bind.
	pub fn cursor(&self) -> usize {
		self.sequence.cursor()
	}

	pub fn is_bound(&self) -> bool {
		self.slot.is_bound()
	}

	pub fn is_finished(&self) -> bool {
		self.scanner_eof
	}

	/// Binds the range under the cursor, or marks the scan finished when
	/// there is none. The cursor only advances past a range once it is bound.
	#[instrument(level = "trace", skip_all, name = "scan::file::open_next_range")]
	fn open_next_range(&mut self) -> Result<()> {
		let Some(range) = self.sequence.peek() else {
			self.slot.release();
			self.scanner_eof = true;
			debug!(ranges = self.sequence.len(), "scan exhausted");
			return Ok(());
		};

		if let Err(err) = self.slot.rebind(range, &self.params, &self.env, &self.options) {
			warn!(
				cursor = self.sequence.cursor(),
				path = %range.path,
				transport = %range.file_type,
				error = %err,
				"failed to bind range"
			);
			return Err(err);
		}

		self.counters.inc_ranges_opened();
		self.sequence.advance();
		Ok(())
	}
}

impl Scanner for FileScanner {
	#[instrument(level = "trace", skip_all, name = "scan::file::open")]
	fn open(&mut self) -> Result<()> {
		self.params.validate()?;
		self.options = self.params.reader_options()?;
		self.materializer.prepare(&self.params.src_slots, &self.params.dest_slots)?;
		self.raw = RawRow::for_schema(&self.params.src_slots);
		self.opened = true;
		debug!(ranges = self.sequence.len(), "file scanner opened");
		Ok(())
	}

	#[instrument(level = "trace", skip_all, name = "scan::file::get_next")]
	fn get_next(&mut self, tuple: &mut Tuple, pool: &mut ScratchPool) -> Result<Next> {
		if !self.opened {
			return Err(internal_error!("get_next called before open"));
		}

		let counters = Arc::clone(&self.counters);
		let _timer = counters.time_read();

		while !self.scanner_eof {
			if !self.slot.is_bound() || self.range_eof {
				// stays set until a range is bound, so a failed bind is
				// re-attempted by the next call
				self.range_eof = true;
				self.open_next_range()?;
				if self.scanner_eof {
					break;
				}
				self.range_eof = false;
			}

			let Some(reader) = self.slot.reader() else {
				return Err(internal_error!("no reader bound after opening range"));
			};
			let status = reader.read(&mut self.raw, &self.params.src_slots, pool)?;
			if status.is_range_eof() {
				self.range_eof = true;
			}
			if !status.has_row() {
				continue;
			}

			counters.inc_rows_read();
			let accepted = {
				let _timer = counters.time_materialize();
				self.materializer.materialize(&self.raw, tuple, pool)
			};
			if accepted {
				return Ok(Next::Tuple);
			}
			counters.inc_rows_filtered();
		}

		Ok(Next::EndOfScan)
	}

	#[instrument(level = "trace", skip_all, name = "scan::file::close")]
	fn close(&mut self) {
		self.slot.release();
		self.scanner_eof = true;
		if !self.closed {
			self.closed = true;
			debug!(
				rows_read = self.counters.rows_read(),
				rows_filtered = self.counters.rows_filtered(),
				ranges_opened = self.counters.ranges_opened(),
				"file scanner closed"
			);
		}
	}
}

impl Drop for FileScanner {
	fn drop(&mut self) {
		self.close();
	}
}
