// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::VecDeque;

use ingest_type::{Error, Result, internal_error};
use parking_lot::{Condvar, Mutex};
use tracing::debug;

/// Default number of buffered bytes before producers block.
pub const DEFAULT_PIPE_CAPACITY: usize = 1024 * 1024;

struct PipeState {
	buf: VecDeque<u8>,
	lines_read: u64,
	finished: bool,
	cancelled: Option<String>,
}

/// Bounded byte buffer between a stream load producer and a scanner.
///
/// The producer pushes request body chunks with [`StreamLoadPipe::append`] and
/// blocks while `capacity` bytes are buffered. Consumers block until data
/// arrives, the producer finishes, or either side cancels. Pipes are shared
/// through `Arc`; nothing in the scan path ever owns one exclusively.
///
/// Consumers take turns: the line being assembled sits behind its own lock,
/// held by one consumer from the first byte to the terminator.
pub struct StreamLoadPipe {
	state: Mutex<PipeState>,
	/// Consumer-side line being assembled. Lock order: `line`, then `state`.
	line: Mutex<Vec<u8>>,
	not_empty: Condvar,
	not_full: Condvar,
	capacity: usize,
}

impl StreamLoadPipe {
	pub fn new(capacity: usize) -> Self {
		Self {
			state: Mutex::new(PipeState {
				buf: VecDeque::new(),
				lines_read: 0,
				finished: false,
				cancelled: None,
			}),
			line: Mutex::new(Vec::new()),
			not_empty: Condvar::new(),
			not_full: Condvar::new(),
			capacity: capacity.max(1),
		}
	}

	/// Appends a chunk, blocking while the buffer is full.
	///
	/// A chunk is accepted whole once there is any room, so a chunk larger
	/// than the capacity never deadlocks the producer.
	pub fn append(&self, data: &[u8]) -> Result<()> {
		let mut state = self.state.lock();
		loop {
			if let Some(reason) = &state.cancelled {
				return Err(Error::PipeCancelled {
					reason: reason.clone(),
				});
			}
			if state.finished {
				return Err(internal_error!("append to finished stream load pipe"));
			}
			if state.buf.len() < self.capacity {
				break;
			}
			self.not_full.wait(&mut state);
		}

		state.buf.extend(data);
		self.not_empty.notify_all();
		Ok(())
	}

	/// Marks the end of the producer's data. Buffered bytes stay readable.
	pub fn finish(&self) {
		let mut state = self.state.lock();
		state.finished = true;
		self.not_empty.notify_all();
		self.not_full.notify_all();
	}

	/// Aborts the load. Buffered bytes are discarded and both sides fail.
	pub fn cancel(&self, reason: impl Into<String>) {
		let mut state = self.state.lock();
		if state.cancelled.is_none() {
			let reason = reason.into();
			debug!(reason = %reason, "stream load pipe cancelled");
			state.cancelled = Some(reason);
		}
		state.buf.clear();
		self.not_empty.notify_all();
		self.not_full.notify_all();
	}

	pub fn is_cancelled(&self) -> bool {
		self.state.lock().cancelled.is_some()
	}

	pub fn buffered(&self) -> usize {
		self.state.lock().buf.len()
	}

	/// Reads up to `buf.len()` bytes, blocking until data is available.
	/// Returns `0` once the producer finished and the buffer is drained.
	pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}

		let _turn = self.line.lock();
		let mut state = self.state.lock();
		loop {
			if let Some(reason) = &state.cancelled {
				return Err(Error::PipeCancelled {
					reason: reason.clone(),
				});
			}
			if !state.buf.is_empty() {
				let n = buf.len().min(state.buf.len());
				for (dst, src) in buf.iter_mut().zip(state.buf.drain(..n)) {
					*dst = src;
				}
				self.not_full.notify_all();
				return Ok(n);
			}
			if state.finished {
				return Ok(0);
			}
			self.not_empty.wait(&mut state);
		}
	}

	/// Reads the next line into `line`, without its terminator.
	///
	/// Returns `false` once the producer finished and no bytes are left.
	pub fn read_line(&self, line: &mut Vec<u8>) -> Result<bool> {
		line.clear();
		Ok(self.next_line(|bytes, _| line.extend_from_slice(bytes))?.is_some())
	}

	/// Hands the next line, without its terminator, and its 1-based line
	/// number to `f`.
	///
	/// Returns `None` once the producer finished and no bytes are left. A
	/// trailing line without a newline is still a line. Partial lines are
	/// moved out of the buffer while waiting, so a line longer than the
	/// capacity cannot stall the producer. Other consumers wait until the
	/// line is complete. `f` runs under the pipe lock and must not call back
	/// into the pipe.
	pub fn next_line<R>(&self, f: impl FnOnce(&[u8], u64) -> R) -> Result<Option<R>> {
		let mut line = self.line.lock();
		line.clear();
		let mut state = self.state.lock();

		loop {
			if let Some(reason) = &state.cancelled {
				return Err(Error::PipeCancelled {
					reason: reason.clone(),
				});
			}

			if let Some(pos) = state.buf.iter().position(|b| *b == b'\n') {
				line.extend(state.buf.drain(..=pos));
				line.pop();
				if line.last() == Some(&b'\r') {
					line.pop();
				}
				state.lines_read += 1;
				self.not_full.notify_all();
				return Ok(Some(f(&line, state.lines_read)));
			}

			if !state.buf.is_empty() {
				line.extend(state.buf.drain(..));
				self.not_full.notify_all();
			}

			if state.finished {
				if line.last() == Some(&b'\r') {
					line.pop();
				}
				if line.is_empty() {
					return Ok(None);
				}
				state.lines_read += 1;
				return Ok(Some(f(&line, state.lines_read)));
			}

			self.not_empty.wait(&mut state);
		}
	}
}

impl Default for StreamLoadPipe {
	fn default() -> Self {
		Self::new(DEFAULT_PIPE_CAPACITY)
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread};

	use ingest_type::ErrorKind;

	use super::*;

	#[test]
	fn test_lines_are_split_on_newline() {
		let pipe = StreamLoadPipe::new(64);
		pipe.append(b"first\r\nsec").unwrap();
		pipe.append(b"ond\nthird").unwrap();
		pipe.finish();

		let mut line = Vec::new();
		assert!(pipe.read_line(&mut line).unwrap());
		assert_eq!(line, b"first");
		assert!(pipe.read_line(&mut line).unwrap());
		assert_eq!(line, b"second");
		assert!(pipe.read_line(&mut line).unwrap());
		assert_eq!(line, b"third");
		assert!(!pipe.read_line(&mut line).unwrap());
	}

	#[test]
	fn test_producer_blocks_until_consumer_drains() {
		let pipe = Arc::new(StreamLoadPipe::new(4));
		let producer = {
			let pipe = Arc::clone(&pipe);
			thread::spawn(move || {
				for i in 0..50 {
					pipe.append(format!("row{i}\n").as_bytes()).unwrap();
				}
				pipe.finish();
			})
		};

		let mut line = Vec::new();
		let mut count = 0;
		while pipe.read_line(&mut line).unwrap() {
			assert_eq!(line, format!("row{count}").as_bytes());
			count += 1;
		}
		producer.join().unwrap();
		assert_eq!(count, 50);
	}

	#[test]
	fn test_line_longer_than_capacity() {
		let pipe = Arc::new(StreamLoadPipe::new(2));
		let producer = {
			let pipe = Arc::clone(&pipe);
			thread::spawn(move || {
				for chunk in [b"ab".as_slice(), b"cd", b"ef", b"\n"] {
					pipe.append(chunk).unwrap();
				}
				pipe.finish();
			})
		};

		let mut line = Vec::new();
		assert!(pipe.read_line(&mut line).unwrap());
		assert_eq!(line, b"abcdef");
		assert!(!pipe.read_line(&mut line).unwrap());
		producer.join().unwrap();
	}

	#[test]
	fn test_cancel_fails_both_sides() {
		let pipe = StreamLoadPipe::new(16);
		pipe.append(b"partial").unwrap();
		pipe.cancel("client disconnected");

		let err = pipe.read_line(&mut Vec::new()).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
		assert!(err.to_string().contains("client disconnected"));
		assert!(pipe.append(b"more").is_err());
		assert_eq!(pipe.buffered(), 0);
	}

	#[test]
	fn test_read_bytes() {
		let pipe = StreamLoadPipe::new(16);
		pipe.append(b"hello").unwrap();
		pipe.finish();

		let mut buf = [0u8; 3];
		assert_eq!(pipe.read(&mut buf).unwrap(), 3);
		assert_eq!(&buf, b"hel");
		assert_eq!(pipe.read(&mut buf).unwrap(), 2);
		assert_eq!(&buf[..2], b"lo");
		assert_eq!(pipe.read(&mut buf).unwrap(), 0);
	}

	#[test]
	fn test_append_after_finish_is_rejected() {
		let pipe = StreamLoadPipe::new(16);
		pipe.finish();
		assert_eq!(pipe.append(b"late").unwrap_err().kind(), ErrorKind::Internal);
	}
}
