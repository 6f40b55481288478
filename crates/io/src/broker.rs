// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Remote files served by brokers.
//!
//! The wire protocol is behind [`BrokerClient`]; [`BrokerSource`] only knows
//! how to pick a broker and how to walk a file with positioned reads.

use std::{
	collections::BTreeMap,
	fmt::{self, Display, Formatter},
	sync::Arc,
};

use ingest_type::{Error, Result, internal_error};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ByteSource;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrokerAddress {
	pub hostname: String,
	pub port: u16,
}

impl BrokerAddress {
	pub fn new(hostname: impl Into<String>, port: u16) -> Self {
		Self {
			hostname: hostname.into(),
			port,
		}
	}
}

impl Display for BrokerAddress {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.hostname, self.port)
	}
}

/// Handle of a file opened on a broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrokerFd(pub u64);

/// Connection to the broker service.
pub trait BrokerClient: Send + Sync {
	fn open_reader(
		&self,
		address: &BrokerAddress,
		path: &str,
		start_offset: u64,
		properties: &BTreeMap<String, String>,
	) -> Result<BrokerFd>;

	/// Reads up to `length` bytes at `offset`. An empty result means end of file.
	fn pread(&self, address: &BrokerAddress, fd: BrokerFd, offset: u64, length: usize) -> Result<Vec<u8>>;

	fn close_reader(&self, address: &BrokerAddress, fd: BrokerFd) -> Result<()>;
}

/// A remote file read through the first broker that accepts the open.
///
/// The remote handle is closed exactly once, when the source is dropped.
pub struct BrokerSource {
	client: Arc<dyn BrokerClient>,
	addresses: Vec<BrokerAddress>,
	properties: BTreeMap<String, String>,
	path: String,
	position: u64,
	opened: Option<(usize, BrokerFd)>,
}

impl BrokerSource {
	pub fn new(
		client: Arc<dyn BrokerClient>,
		addresses: Vec<BrokerAddress>,
		properties: BTreeMap<String, String>,
		path: impl Into<String>,
		start_offset: u64,
	) -> Self {
		Self {
			client,
			addresses,
			properties,
			path: path.into(),
			position: start_offset,
			opened: None,
		}
	}

	/// The broker serving this file, once opened.
	pub fn address(&self) -> Option<&BrokerAddress> {
		self.opened.map(|(idx, _)| &self.addresses[idx])
	}
}

impl ByteSource for BrokerSource {
	fn open(&mut self) -> Result<()> {
		if self.opened.is_some() {
			return Err(internal_error!("broker file {} opened twice", self.path));
		}
		if self.addresses.is_empty() {
			return Err(Error::BrokerUnavailable {
				path: self.path.clone(),
				reason: "no broker address configured".to_string(),
			});
		}

		let mut last_error = None;
		for (idx, address) in self.addresses.iter().enumerate() {
			match self.client.open_reader(address, &self.path, self.position, &self.properties) {
				Ok(fd) => {
					debug!(path = %self.path, broker = %address, "opened broker file");
					self.opened = Some((idx, fd));
					return Ok(());
				}
				Err(err) => {
					warn!(path = %self.path, broker = %address, error = %err, "broker open failed, trying next broker");
					last_error = Some(err);
				}
			}
		}

		Err(Error::BrokerUnavailable {
			path: self.path.clone(),
			reason: last_error.map(|err| err.to_string()).unwrap_or_default(),
		})
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		let Some((idx, fd)) = self.opened else {
			return Err(internal_error!("read from unopened broker file {}", self.path));
		};

		let data = self.client.pread(&self.addresses[idx], fd, self.position, buf.len())?;
		if data.len() > buf.len() {
			return Err(internal_error!(
				"broker returned {} bytes for a {} byte read of {}",
				data.len(),
				buf.len(),
				self.path
			));
		}

		buf[..data.len()].copy_from_slice(&data);
		self.position += data.len() as u64;
		Ok(data.len())
	}

	fn position(&self) -> u64 {
		self.position
	}

	fn path(&self) -> &str {
		&self.path
	}
}

impl Drop for BrokerSource {
	fn drop(&mut self) {
		if let Some((idx, fd)) = self.opened.take() {
			let address = &self.addresses[idx];
			if let Err(err) = self.client.close_reader(address, fd) {
				warn!(path = %self.path, broker = %address, error = %err, "failed to close broker file");
			}
		}
	}
}
