// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Registry of live stream load pipes.
//!
//! The stream load handler registers a pipe under its load id before it
//! starts feeding it; scanners look the pipe up when they bind a streaming
//! range. Lookups hand out a new `Arc`, the registry keeps its own.

use std::sync::Arc;

use dashmap::DashMap;
use ingest_type::{Error, LoadId, Result};
use tracing::debug;

use crate::StreamLoadPipe;

/// Thread-safe map from load id to the pipe of that load.
#[derive(Default)]
pub struct LoadStreamRegistry {
	pipes: DashMap<LoadId, Arc<StreamLoadPipe>>,
}

impl LoadStreamRegistry {
	/// Create a new empty registry.
	pub fn new() -> Self {
		Self {
			pipes: DashMap::new(),
		}
	}

	/// Register the pipe of a load. Fails if the load id is already taken.
	pub fn put(&self, load_id: LoadId, pipe: Arc<StreamLoadPipe>) -> Result<()> {
		if self.pipes.contains_key(&load_id) {
			return Err(Error::config(format!("stream load pipe already registered, load_id={load_id}")));
		}
		self.pipes.insert(load_id, pipe);
		debug!(%load_id, "registered stream load pipe");
		Ok(())
	}

	pub fn get(&self, load_id: &LoadId) -> Option<Arc<StreamLoadPipe>> {
		self.pipes.get(load_id).map(|entry| Arc::clone(entry.value()))
	}

	/// Unregister a load. Holders of the pipe keep it alive until they drop it.
	pub fn remove(&self, load_id: &LoadId) -> Option<Arc<StreamLoadPipe>> {
		let removed = self.pipes.remove(load_id).map(|(_, pipe)| pipe);
		if removed.is_some() {
			debug!(%load_id, "unregistered stream load pipe");
		}
		removed
	}

	pub fn len(&self) -> usize {
		self.pipes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pipes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_hands_out_shared_handles() {
		let registry = LoadStreamRegistry::new();
		let load_id = LoadId::generate();
		let pipe = Arc::new(StreamLoadPipe::new(16));
		registry.put(load_id, Arc::clone(&pipe)).unwrap();

		let found = registry.get(&load_id).unwrap();
		assert!(Arc::ptr_eq(&found, &pipe));
		assert_eq!(Arc::strong_count(&pipe), 3);

		drop(found);
		assert_eq!(Arc::strong_count(&pipe), 2);
	}

	#[test]
	fn test_duplicate_load_id_is_rejected() {
		let registry = LoadStreamRegistry::new();
		let load_id = LoadId::generate();
		registry.put(load_id, Arc::new(StreamLoadPipe::new(16))).unwrap();
		assert!(registry.put(load_id, Arc::new(StreamLoadPipe::new(16))).is_err());
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_remove_keeps_outstanding_handles_alive() {
		let registry = LoadStreamRegistry::new();
		let load_id = LoadId::generate();
		registry.put(load_id, Arc::new(StreamLoadPipe::new(16))).unwrap();

		let held = registry.get(&load_id).unwrap();
		assert!(registry.remove(&load_id).is_some());
		assert!(registry.get(&load_id).is_none());
		assert!(registry.is_empty());

		held.append(b"still usable\n").unwrap();
		assert_eq!(held.buffered(), 13);
	}
}
