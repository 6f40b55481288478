// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashSet,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};

use ingest_format::{DefaultReaderFactory, ReadStatus, ReaderFactory, ReaderOptions, RecordReader};
use ingest_io::ByteSource;
use ingest_type::{Error, RangeDescriptor, RawRow, Result, ScratchPool, TupleDescriptor};
use parking_lot::Mutex;

#[derive(Default)]
struct Counts {
	created: AtomicUsize,
	dropped: AtomicUsize,
}

/// Wraps [`DefaultReaderFactory`] and counts the readers it hands out and
/// the ones that have been destroyed since.
#[derive(Clone, Default)]
pub struct TrackingReaderFactory {
	counts: Arc<Counts>,
	fail_init: Arc<Mutex<HashSet<String>>>,
}

impl TrackingReaderFactory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Readers created for `path` fail in [`RecordReader::init`].
	pub fn fail_init_for(&self, path: impl Into<String>) {
		self.fail_init.lock().insert(path.into());
	}

	pub fn created(&self) -> usize {
		self.counts.created.load(Ordering::SeqCst)
	}

	pub fn dropped(&self) -> usize {
		self.counts.dropped.load(Ordering::SeqCst)
	}

	/// Readers created and not yet destroyed.
	pub fn live(&self) -> usize {
		self.created() - self.dropped()
	}
}

impl ReaderFactory for TrackingReaderFactory {
	fn create(
		&self,
		range: &RangeDescriptor,
		source: Box<dyn ByteSource>,
		options: &ReaderOptions,
	) -> Result<Box<dyn RecordReader>> {
		let inner = DefaultReaderFactory.create(range, source, options)?;
		self.counts.created.fetch_add(1, Ordering::SeqCst);
		Ok(Box::new(TrackedReader {
			inner,
			path: range.path.clone(),
			fail_init: self.fail_init.lock().contains(&range.path),
			counts: Arc::clone(&self.counts),
		}))
	}
}

struct TrackedReader {
	inner: Box<dyn RecordReader>,
	path: String,
	fail_init: bool,
	counts: Arc<Counts>,
}

impl RecordReader for TrackedReader {
	fn init(&mut self, schema: &TupleDescriptor) -> Result<()> {
		if self.fail_init {
			return Err(Error::format(&self.path, 0, "reader refused to initialize"));
		}
		self.inner.init(schema)
	}

	fn read(&mut self, row: &mut RawRow, schema: &TupleDescriptor, pool: &mut ScratchPool) -> Result<ReadStatus> {
		self.inner.read(row, schema, pool)
	}
}

impl Drop for TrackedReader {
	fn drop(&mut self) {
		self.counts.dropped.fetch_add(1, Ordering::SeqCst);
	}
}
