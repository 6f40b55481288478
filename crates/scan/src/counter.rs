// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::atomic::{AtomicU64, Ordering},
	time::{Duration, Instant},
};

use serde::Serialize;

/// Running totals of one scan. Updated by the scanner, readable from any
/// thread while the scan runs.
#[derive(Debug, Default)]
pub struct ScanCounters {
	rows_read: AtomicU64,
	rows_filtered: AtomicU64,
	ranges_opened: AtomicU64,
	read_nanos: AtomicU64,
	materialize_nanos: AtomicU64,
}

/// Point-in-time copy of [`ScanCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
	pub rows_read: u64,
	pub rows_filtered: u64,
	pub ranges_opened: u64,
	pub read_time: Duration,
	pub materialize_time: Duration,
}

impl ScanCounters {
	/// Raw rows pulled from readers, filtered ones included.
	pub fn rows_read(&self) -> u64 {
		self.rows_read.load(Ordering::Relaxed)
	}

	/// Raw rows the materializer rejected.
	pub fn rows_filtered(&self) -> u64 {
		self.rows_filtered.load(Ordering::Relaxed)
	}

	pub fn ranges_opened(&self) -> u64 {
		self.ranges_opened.load(Ordering::Relaxed)
	}

	/// Time spent inside `get_next`, materialization included.
	pub fn read_time(&self) -> Duration {
		Duration::from_nanos(self.read_nanos.load(Ordering::Relaxed))
	}

	pub fn materialize_time(&self) -> Duration {
		Duration::from_nanos(self.materialize_nanos.load(Ordering::Relaxed))
	}

	pub fn snapshot(&self) -> CounterSnapshot {
		CounterSnapshot {
			rows_read: self.rows_read(),
			rows_filtered: self.rows_filtered(),
			ranges_opened: self.ranges_opened(),
			read_time: self.read_time(),
			materialize_time: self.materialize_time(),
		}
	}

	pub(crate) fn inc_rows_read(&self) {
		self.rows_read.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn inc_rows_filtered(&self) {
		self.rows_filtered.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn inc_ranges_opened(&self) {
		self.ranges_opened.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn time_read(&self) -> Timer<'_> {
		Timer::new(&self.read_nanos)
	}

	pub(crate) fn time_materialize(&self) -> Timer<'_> {
		Timer::new(&self.materialize_nanos)
	}
}

/// Adds the time until drop to a counter, on every exit path.
pub(crate) struct Timer<'a> {
	total: &'a AtomicU64,
	start: Instant,
}

impl<'a> Timer<'a> {
	fn new(total: &'a AtomicU64) -> Self {
		Self {
			total,
			start: Instant::now(),
		}
	}
}

impl Drop for Timer<'_> {
	fn drop(&mut self) {
		let nanos = u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX);
		self.total.fetch_add(nanos, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	use std::thread;

	use super::*;

	#[test]
	fn test_timer_accumulates() {
		let counters = ScanCounters::default();
		{
			let _timer = counters.time_materialize();
			thread::sleep(Duration::from_millis(2));
		}
		{
			let _timer = counters.time_materialize();
			thread::sleep(Duration::from_millis(2));
		}
		assert!(counters.materialize_time() >= Duration::from_millis(4));
		assert_eq!(counters.read_time(), Duration::ZERO);
	}

	#[test]
	fn test_snapshot() {
		let counters = ScanCounters::default();
		counters.inc_rows_read();
		counters.inc_rows_read();
		counters.inc_rows_filtered();
		counters.inc_ranges_opened();

		let snapshot = counters.snapshot();
		assert_eq!(snapshot.rows_read, 2);
		assert_eq!(snapshot.rows_filtered, 1);
		assert_eq!(snapshot.ranges_opened, 1);
	}
}
