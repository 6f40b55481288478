// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test doubles and helpers shared by the ingest crates' tests.

pub mod broker;
pub mod reader;
pub mod tempdir;
pub mod util;

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Installs a test-friendly subscriber honoring `RUST_LOG`. Safe to call
/// from every test.
pub fn init_tracing() {
	INIT.call_once(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
		let _ = fmt().with_env_filter(filter).with_test_writer().with_target(false).try_init();
	});
}
