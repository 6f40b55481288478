// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory broker service.

use std::{
	collections::{BTreeMap, HashMap, HashSet},
	io,
	sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};

use ingest_io::{BrokerAddress, BrokerClient, BrokerFd};
use ingest_type::{Error, Result};
use parking_lot::Mutex;

/// Serves files from memory and counts every open and close it sees.
///
/// Addresses marked with [`MemoryBroker::fail_address`] reject every open,
/// which lets tests exercise broker failover.
#[derive(Default)]
pub struct MemoryBroker {
	files: Mutex<HashMap<String, Vec<u8>>>,
	failing: Mutex<HashSet<BrokerAddress>>,
	handles: Mutex<HashMap<BrokerFd, String>>,
	next_fd: AtomicU64,
	opened: AtomicUsize,
	closed: AtomicUsize,
}

impl MemoryBroker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_file(&self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
		self.files.lock().insert(path.into(), contents.into());
	}

	pub fn fail_address(&self, address: BrokerAddress) {
		self.failing.lock().insert(address);
	}

	/// Number of successful opens.
	pub fn opened(&self) -> usize {
		self.opened.load(Ordering::SeqCst)
	}

	pub fn closed(&self) -> usize {
		self.closed.load(Ordering::SeqCst)
	}

	/// Handles opened and not yet closed.
	pub fn open_handles(&self) -> usize {
		self.handles.lock().len()
	}
}

impl BrokerClient for MemoryBroker {
	fn open_reader(
		&self,
		address: &BrokerAddress,
		path: &str,
		_start_offset: u64,
		_properties: &BTreeMap<String, String>,
	) -> Result<BrokerFd> {
		if self.failing.lock().contains(address) {
			return Err(Error::Io(io::Error::new(
				io::ErrorKind::ConnectionRefused,
				format!("broker {address} refused the connection"),
			)));
		}
		if !self.files.lock().contains_key(path) {
			return Err(Error::Open {
				path: path.to_string(),
				source: io::Error::new(io::ErrorKind::NotFound, "no such file on broker"),
			});
		}

		let fd = BrokerFd(self.next_fd.fetch_add(1, Ordering::SeqCst));
		self.handles.lock().insert(fd, path.to_string());
		self.opened.fetch_add(1, Ordering::SeqCst);
		Ok(fd)
	}

	fn pread(&self, _address: &BrokerAddress, fd: BrokerFd, offset: u64, length: usize) -> Result<Vec<u8>> {
		let handles = self.handles.lock();
		let Some(path) = handles.get(&fd) else {
			return Err(Error::Io(io::Error::new(io::ErrorKind::InvalidInput, format!("unknown broker fd {}", fd.0))));
		};

		let files = self.files.lock();
		let data = files.get(path).map(Vec::as_slice).unwrap_or_default();
		let start = (offset as usize).min(data.len());
		let end = start.saturating_add(length).min(data.len());
		Ok(data[start..end].to_vec())
	}

	fn close_reader(&self, _address: &BrokerAddress, fd: BrokerFd) -> Result<()> {
		if self.handles.lock().remove(&fd).is_none() {
			return Err(Error::Io(io::Error::new(io::ErrorKind::InvalidInput, format!("broker fd {} closed twice", fd.0))));
		}
		self.closed.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}
