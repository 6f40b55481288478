// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Byte sources of the ingest scan path.
//!
//! A scan range reaches its bytes through one of three transports:
//! - [`LocalFileSource`] reads a file on the local disk
//! - [`BrokerSource`] reads a remote file through a broker, failing over
//!   between broker addresses on open
//! - [`StreamLoadPipe`] is a bounded buffer fed by a concurrent producer and
//!   shared through the [`LoadStreamRegistry`]
//!
//! Local and broker sources are owned by exactly one reader. Pipes are shared;
//! a consumer only ever drops its own handle.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod broker;
mod local;
mod pipe;
mod registry;

pub use broker::{BrokerAddress, BrokerClient, BrokerFd, BrokerSource};
use ingest_type::Result;
pub use local::LocalFileSource;
pub use pipe::{DEFAULT_PIPE_CAPACITY, StreamLoadPipe};
pub use registry::LoadStreamRegistry;

/// An openable byte stream positioned at a start offset.
pub trait ByteSource: Send {
	/// Opens the underlying resource and positions it at the start offset.
	fn open(&mut self) -> Result<()>;

	/// Reads up to `buf.len()` bytes. Returns `0` at end of data.
	fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

	/// Absolute offset of the next byte [`ByteSource::read`] returns.
	fn position(&self) -> u64;

	fn path(&self) -> &str;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
	fn open(&mut self) -> Result<()> {
		(**self).open()
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		(**self).read(buf)
	}

	fn position(&self) -> u64 {
		(**self).position()
	}

	fn path(&self) -> &str {
		(**self).path()
	}
}
