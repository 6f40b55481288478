// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, sync::Arc};

use ingest_io::{BrokerAddress, BrokerSource, ByteSource};
use ingest_testing::broker::MemoryBroker;
use ingest_type::ErrorKind;

fn broker_source(broker: &Arc<MemoryBroker>, addresses: Vec<BrokerAddress>, path: &str, offset: u64) -> BrokerSource {
	BrokerSource::new(broker.clone(), addresses, BTreeMap::new(), path, offset)
}

#[test]
fn test_reads_whole_file_from_offset() {
	let broker = Arc::new(MemoryBroker::new());
	broker.add_file("hdfs://nn/a", b"0123456789".to_vec());

	let mut source = broker_source(&broker, vec![BrokerAddress::new("b1", 8000)], "hdfs://nn/a", 3);
	source.open().unwrap();

	let mut out = Vec::new();
	let mut buf = [0u8; 4];
	loop {
		let n = source.read(&mut buf).unwrap();
		if n == 0 {
			break;
		}
		out.extend_from_slice(&buf[..n]);
	}
	assert_eq!(out, b"3456789");
	assert_eq!(source.position(), 10);
}

#[test]
fn test_fails_over_to_next_broker() {
	let broker = Arc::new(MemoryBroker::new());
	broker.add_file("hdfs://nn/a", b"data".to_vec());
	let down = BrokerAddress::new("b1", 8000);
	let up = BrokerAddress::new("b2", 8000);
	broker.fail_address(down.clone());

	let mut source = broker_source(&broker, vec![down, up.clone()], "hdfs://nn/a", 0);
	source.open().unwrap();
	assert_eq!(source.address(), Some(&up));
	assert_eq!(broker.opened(), 1);
}

#[test]
fn test_all_brokers_down() {
	let broker = Arc::new(MemoryBroker::new());
	broker.add_file("hdfs://nn/a", b"data".to_vec());
	let down = BrokerAddress::new("b1", 8000);
	broker.fail_address(down.clone());

	let mut source = broker_source(&broker, vec![down], "hdfs://nn/a", 0);
	let err = source.open().unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
	assert!(err.to_string().contains("refused"));

	let mut source = broker_source(&broker, Vec::new(), "hdfs://nn/a", 0);
	assert_eq!(source.open().unwrap_err().kind(), ErrorKind::ResourceUnavailable);
}

#[test]
fn test_handle_closed_once_on_drop() {
	let broker = Arc::new(MemoryBroker::new());
	broker.add_file("hdfs://nn/a", b"data".to_vec());

	let mut source = broker_source(&broker, vec![BrokerAddress::new("b1", 8000)], "hdfs://nn/a", 0);
	source.open().unwrap();
	assert_eq!(source.open().unwrap_err().kind(), ErrorKind::Internal);
	assert_eq!(broker.open_handles(), 1);

	drop(source);
	assert_eq!(broker.closed(), 1);
	assert_eq!(broker.open_handles(), 0);

	let never_opened = broker_source(&broker, vec![BrokerAddress::new("b1", 8000)], "hdfs://nn/a", 0);
	drop(never_opened);
	assert_eq!(broker.closed(), 1);
}
