// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	io,
};

use crate::range::LoadId;

/// Broad classification of an [`Error`].
///
/// Callers branch on the kind rather than on individual variants, e.g. to
/// decide whether a failed load should be reported as a user mistake or as
/// an unavailable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The scan was set up with something the scanner cannot handle.
	Configuration,
	/// A file, broker or stream the scan depends on could not be reached.
	ResourceUnavailable,
	/// Bytes were read but could not be decoded into a row.
	Format,
	/// A scanner invariant was violated.
	Internal,
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ErrorKind::Configuration => f.write_str("configuration"),
			ErrorKind::ResourceUnavailable => f.write_str("resource unavailable"),
			ErrorKind::Format => f.write_str("format"),
			ErrorKind::Internal => f.write_str("internal"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unsupported transport kind: {kind}")]
	UnsupportedTransport {
		kind: String,
	},

	#[error("unsupported format: {format}")]
	UnsupportedFormat {
		format: String,
	},

	#[error("invalid scan configuration: {0}")]
	Config(String),

	#[error("no broker client configured to read {path}")]
	BrokerNotConfigured {
		path: String,
	},

	#[error("stream load pipe not found, load_id={load_id}")]
	PipeNotFound {
		load_id: LoadId,
	},

	#[error("stream load pipe not found, range has no load id")]
	MissingLoadId,

	#[error("failed to open {path}: {source}")]
	Open {
		path: String,
		#[source]
		source: io::Error,
	},

	#[error("no broker could serve {path}: {reason}")]
	BrokerUnavailable {
		path: String,
		reason: String,
	},

	#[error("stream load pipe cancelled: {reason}")]
	PipeCancelled {
		reason: String,
	},

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("malformed record in {path} at line {line}: {reason}")]
	Format {
		path: String,
		line: u64,
		reason: String,
	},

	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::UnsupportedTransport {
				..
			}
			| Error::UnsupportedFormat {
				..
			}
			| Error::Config(_)
			| Error::BrokerNotConfigured {
				..
			}
			| Error::MissingLoadId => ErrorKind::Configuration,

			Error::PipeNotFound {
				..
			}
			| Error::Open {
				..
			}
			| Error::BrokerUnavailable {
				..
			}
			| Error::PipeCancelled {
				..
			}
			| Error::Io(_) => ErrorKind::ResourceUnavailable,

			Error::Format {
				..
			}
			| Error::Json(_) => ErrorKind::Format,

			Error::Internal(_) => ErrorKind::Internal,
		}
	}

	pub fn config(reason: impl Into<String>) -> Self {
		Error::Config(reason.into())
	}

	pub fn format(path: impl Into<String>, line: u64, reason: impl Display) -> Self {
		Error::Format {
			path: path.into(),
			line,
			reason: reason.to_string(),
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds an [`Error::Internal`] tagged with the source location.
#[macro_export]
macro_rules! internal_error {
	($reason:expr) => {
		$crate::Error::Internal(format!("{} ({}:{})", $reason, file!(), line!()))
	};
	($fmt:expr, $($arg:tt)*) => {
		$crate::Error::Internal(format!("{} ({}:{})", format!($fmt, $($arg)*), file!(), line!()))
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_kind_classification() {
		let err = Error::UnsupportedTransport {
			kind: "hdfs".to_string(),
		};
		assert_eq!(err.kind(), ErrorKind::Configuration);
		assert_eq!(err.to_string(), "unsupported transport kind: hdfs");

		let err = Error::PipeNotFound {
			load_id: LoadId::nil(),
		};
		assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);

		let err = Error::format("a.json", 3, "expected object");
		assert_eq!(err.kind(), ErrorKind::Format);
		assert_eq!(err.to_string(), "malformed record in a.json at line 3: expected object");

		let err = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
		assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
	}

	#[test]
	fn test_internal_error_carries_location() {
		let err = internal_error!("slot {} occupied", 3);
		assert_eq!(err.kind(), ErrorKind::Internal);
		let message = err.to_string();
		assert!(message.starts_with("internal error: slot 3 occupied ("));
		assert!(message.contains("error.rs"));
	}
}
