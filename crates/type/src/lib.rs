// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared vocabulary of the ingest scan path.
//!
//! Everything that crosses a crate boundary between the transports, the
//! format readers and the scan orchestrator lives here:
//! - [`Value`] and [`Type`], the cell model of raw rows and tuples
//! - [`TupleDescriptor`], the ordered slot layout of a row
//! - [`RawRow`] and [`Tuple`], the reusable row buffers
//! - [`RangeDescriptor`], one unit of scan work
//! - [`ScratchPool`], the caller-owned arena for transient allocations
//! - [`Error`] and [`Result`]

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
mod pool;
mod range;
mod row;
mod schema;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use pool::ScratchPool;
pub use range::{FormatType, LoadId, RangeDescriptor, TransportKind};
pub use row::{RawRow, Tuple};
pub use schema::{SlotDescriptor, TupleDescriptor};
pub use value::{Type, Value};
