// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use ingest_format::{DefaultReaderFactory, ReaderFactory};
use ingest_io::{BrokerClient, LoadStreamRegistry};

/// Process-level collaborators a scan reaches ranges through.
#[derive(Clone)]
pub struct ScanEnvironment {
	broker: Option<Arc<dyn BrokerClient>>,
	streams: Arc<LoadStreamRegistry>,
	readers: Arc<dyn ReaderFactory>,
}

impl Default for ScanEnvironment {
	fn default() -> Self {
		Self {
			broker: None,
			streams: Arc::new(LoadStreamRegistry::new()),
			readers: Arc::new(DefaultReaderFactory),
		}
	}
}

impl ScanEnvironment {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_broker(mut self, broker: Arc<dyn BrokerClient>) -> Self {
		self.broker = Some(broker);
		self
	}

	pub fn with_streams(mut self, streams: Arc<LoadStreamRegistry>) -> Self {
		self.streams = streams;
		self
	}

	pub fn with_readers(mut self, readers: Arc<dyn ReaderFactory>) -> Self {
		self.readers = readers;
		self
	}

	pub fn broker(&self) -> Option<&Arc<dyn BrokerClient>> {
		self.broker.as_ref()
	}

	pub fn streams(&self) -> &Arc<LoadStreamRegistry> {
		&self.streams
	}

	pub fn readers(&self) -> &dyn ReaderFactory {
		self.readers.as_ref()
	}
}
