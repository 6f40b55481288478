// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The single reader slot of a scan and how ranges are bound into it.
//!
//! A binding either owns its reader, which owns its byte source, or holds a
//! handle to a stream load pipe that other parties share. Releasing an owned
//! binding destroys reader and source; releasing a shared one only drops
//! the handle.

use std::sync::Arc;

use ingest_format::{ReaderOptions, RecordReader};
use ingest_io::{BrokerSource, ByteSource, LocalFileSource, StreamLoadPipe};
use ingest_type::{Error, LoadId, RangeDescriptor, Result, TransportKind, internal_error};
use tracing::{debug, trace};

use crate::{ScanEnvironment, ScanParams};

pub enum Binding {
	/// Reader and source created for this range alone.
	Owned(Box<dyn RecordReader>),
	/// A pipe registered under `load_id`, read in place.
	Shared {
		load_id: LoadId,
		pipe: Arc<StreamLoadPipe>,
	},
}

impl Binding {
	pub fn reader(&mut self) -> &mut dyn RecordReader {
		match self {
			Binding::Owned(reader) => reader.as_mut(),
			Binding::Shared {
				pipe,
				..
			} => pipe,
		}
	}

	pub fn is_shared(&self) -> bool {
		matches!(self, Binding::Shared { .. })
	}
}

#[derive(Default)]
pub struct ReaderSlot {
	binding: Option<Binding>,
}

impl ReaderSlot {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_bound(&self) -> bool {
		self.binding.is_some()
	}

	pub fn binding(&self) -> Option<&Binding> {
		self.binding.as_ref()
	}

	pub fn reader(&mut self) -> Option<&mut dyn RecordReader> {
		self.binding.as_mut().map(Binding::reader)
	}

	/// Empties the slot, releasing the binding according to its ownership.
	pub fn release(&mut self) {
		match self.binding.take() {
			None => {}
			Some(Binding::Owned(reader)) => {
				drop(reader);
				trace!("released owned reader");
			}
			Some(Binding::Shared {
				load_id,
				pipe,
			}) => {
				drop(pipe);
				trace!(%load_id, "released stream load pipe handle");
			}
		}
	}

	/// Stores `binding` in the empty slot.
	pub fn bind(&mut self, binding: Binding) -> Result<&mut Binding> {
		if self.binding.is_some() {
			return Err(internal_error!("reader slot already bound"));
		}
		Ok(self.binding.insert(binding))
	}

	/// Releases the current binding and binds `range` in its place.
	///
	/// An owned reader is stored before it is initialized, so a reader that
	/// fails to initialize is released by the next rebind or by close.
	pub fn rebind(
		&mut self,
		range: &RangeDescriptor,
		params: &ScanParams,
		env: &ScanEnvironment,
		options: &ReaderOptions,
	) -> Result<()> {
		self.release();

		match &range.file_type {
			TransportKind::Local => {
				let mut source = LocalFileSource::new(&range.path, range.start_offset);
				source.open()?;
				self.bind_owned(range, Box::new(source), params, env, options)
			}
			TransportKind::Broker => {
				let client = env.broker().ok_or_else(|| Error::BrokerNotConfigured {
					path: range.path.clone(),
				})?;
				let mut source = BrokerSource::new(
					Arc::clone(client),
					params.broker_addresses.clone(),
					params.properties.clone(),
					&range.path,
					range.start_offset,
				);
				source.open()?;
				self.bind_owned(range, Box::new(source), params, env, options)
			}
			TransportKind::Stream => {
				let load_id = range.load_id.ok_or(Error::MissingLoadId)?;
				let pipe = env.streams().get(&load_id).ok_or(Error::PipeNotFound {
					load_id,
				})?;
				self.bind(Binding::Shared {
					load_id,
					pipe,
				})?;
				debug!(%load_id, "bound stream load pipe");
				Ok(())
			}
			TransportKind::Other(kind) => Err(Error::UnsupportedTransport {
				kind: kind.clone(),
			}),
		}
	}

	fn bind_owned(
		&mut self,
		range: &RangeDescriptor,
		source: Box<dyn ByteSource>,
		params: &ScanParams,
		env: &ScanEnvironment,
		options: &ReaderOptions,
	) -> Result<()> {
		let reader = env.readers().create(range, source, options)?;
		let binding = self.bind(Binding::Owned(reader))?;
		debug!(path = %range.path, transport = %range.file_type, format = %range.format, "bound range reader");
		binding.reader().init(&params.src_slots)
	}
}

#[cfg(test)]
mod tests {
	use ingest_type::{ErrorKind, FormatType, SlotDescriptor, TupleDescriptor, Type};

	use super::*;

	fn params() -> ScanParams {
		let slots = TupleDescriptor::new(vec![SlotDescriptor::new("a", Type::Int8)]);
		ScanParams::new(slots.clone(), slots)
	}

	#[test]
	fn test_bind_into_occupied_slot_is_internal() {
		let mut slot = ReaderSlot::new();
		let pipe = Arc::new(StreamLoadPipe::new(8));
		slot.bind(Binding::Shared {
			load_id: LoadId::generate(),
			pipe: Arc::clone(&pipe),
		})
		.unwrap();

		let err = slot
			.bind(Binding::Shared {
				load_id: LoadId::generate(),
				pipe: Arc::clone(&pipe),
			})
			.err()
			.unwrap();
		assert_eq!(err.kind(), ErrorKind::Internal);
		assert_eq!(Arc::strong_count(&pipe), 2);

		slot.release();
		assert!(!slot.is_bound());
		assert_eq!(Arc::strong_count(&pipe), 1);
	}

	#[test]
	fn test_rebind_dispatches_on_transport() {
		let env = ScanEnvironment::new();
		let options = ReaderOptions::default();
		let mut slot = ReaderSlot::new();

		let range = RangeDescriptor {
			file_type: TransportKind::from("hdfs"),
			..RangeDescriptor::local("/x", FormatType::JsonLines)
		};
		let err = slot.rebind(&range, &params(), &env, &options).unwrap_err();
		assert_eq!(err.to_string(), "unsupported transport kind: hdfs");

		let err = slot.rebind(&RangeDescriptor::broker("/x", FormatType::Csv), &params(), &env, &options).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Configuration);

		let load_id = LoadId::generate();
		let err = slot.rebind(&RangeDescriptor::stream(load_id), &params(), &env, &options).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
		assert!(!slot.is_bound());

		let pipe = Arc::new(StreamLoadPipe::new(8));
		env.streams().put(load_id, Arc::clone(&pipe)).unwrap();
		slot.rebind(&RangeDescriptor::stream(load_id), &params(), &env, &options).unwrap();
		assert!(slot.binding().unwrap().is_shared());
		assert_eq!(Arc::strong_count(&pipe), 3);

		slot.release();
		assert_eq!(Arc::strong_count(&pipe), 2);
	}
}
