// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{sync::Arc, thread};

use ingest_io::StreamLoadPipe;
use ingest_testing::util::wait::wait_for;

fn read_one_line(pipe: &Arc<StreamLoadPipe>) -> thread::JoinHandle<Option<String>> {
	let pipe = Arc::clone(pipe);
	thread::spawn(move || {
		let mut line = Vec::new();
		pipe.read_line(&mut line).unwrap().then(|| String::from_utf8(line).unwrap())
	})
}

#[test]
fn test_second_consumer_keeps_partial_line_intact() {
	let pipe = Arc::new(StreamLoadPipe::new(64));
	pipe.append(b"abc").unwrap();

	let first = read_one_line(&pipe);
	wait_for(|| pipe.buffered() == 0, "first consumer should take the partial line");
	let second = read_one_line(&pipe);

	pipe.append(b"def\nxyz\n").unwrap();
	pipe.finish();

	assert_eq!(first.join().unwrap().as_deref(), Some("abcdef"));
	assert_eq!(second.join().unwrap().as_deref(), Some("xyz"));

	let mut line = Vec::new();
	assert!(!pipe.read_line(&mut line).unwrap());
}

#[test]
fn test_concurrent_consumers_see_every_line_once() {
	let pipe = Arc::new(StreamLoadPipe::new(8));
	let consumers: Vec<_> = (0..3)
		.map(|_| {
			let pipe = Arc::clone(&pipe);
			thread::spawn(move || {
				let mut seen = Vec::new();
				let mut line = Vec::new();
				while pipe.read_line(&mut line).unwrap() {
					seen.push(String::from_utf8(line.clone()).unwrap());
				}
				seen
			})
		})
		.collect();

	for i in 0..100 {
		// split each line across two appends
		let text = format!("row{i}\n");
		let (head, tail) = text.as_bytes().split_at(2);
		pipe.append(head).unwrap();
		pipe.append(tail).unwrap();
	}
	pipe.finish();

	let mut all: Vec<String> = consumers.into_iter().flat_map(|c| c.join().unwrap()).collect();
	all.sort();
	let mut expected: Vec<String> = (0..100).map(|i| format!("row{i}")).collect();
	expected.sort();
	assert_eq!(all, expected);
}
