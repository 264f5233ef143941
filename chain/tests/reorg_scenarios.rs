// Copyright 2018 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end scenarios run against [`MemoryChainStore`].

use std::sync::{Arc, Mutex};

use chainfollow_chain::{ChainProcessor, NullLogger};
use chainfollow_core::{Hash, Header};
use chainfollow_store::MemoryChainStore;
use chainfollow_util::CancellationToken;

fn h(n: u64) -> Hash {
	Hash::from_u64(n)
}

/// Builds a `len`-long chain (including genesis) on a fresh store and
/// sets it as the canonical head. Returns the store and the headers in
/// sequence order.
fn linear_chain(len: u64, salt: u64) -> (MemoryChainStore, Vec<Header>) {
	let genesis = Header::genesis(h(salt));
	let store = MemoryChainStore::new(genesis.clone());
	let mut headers = vec![genesis];
	for i in 1..len {
		let next = Header::child_of(&headers[(i - 1) as usize], h(salt * 1000 + i));
		store.extend(next.clone());
		headers.push(next);
	}
	store.set_head(headers.last().unwrap().hash);
	(store, headers)
}

/// Shared recorder for add/remove callbacks, since the handlers
/// registered on a processor must be 'static and `Send`.
#[derive(Default, Clone)]
struct Recorder {
	added: Arc<Mutex<Vec<Hash>>>,
	removed: Arc<Mutex<Vec<Hash>>>,
}

impl Recorder {
	fn attach<S: chainfollow_store::ChainStore + chainfollow_store::ForkFinder + 'static>(
		&self,
		processor: &mut ChainProcessor<S>,
	) {
		let added = self.added.clone();
		processor.on_add(move |header| {
			added.lock().unwrap().push(header.hash);
			Ok(())
		});
		let removed = self.removed.clone();
		processor.on_remove(move |header| {
			removed.lock().unwrap().push(header.hash);
			Ok(())
		});
	}

	fn added(&self) -> Vec<Hash> {
		self.added.lock().unwrap().clone()
	}

	fn removed(&self) -> Vec<Hash> {
		self.removed.lock().unwrap().clone()
	}
}

/// Scenario: cold start against a store that already has history.
/// The first `advance` should emit `Add` for every header from genesis
/// to head, in order, with no removes.
#[test]
fn cold_start_emits_full_history_as_adds() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(4, 1);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store, Some(Arc::new(NullLogger)), None).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);

	let outcome = processor.advance(None).unwrap();

	assert!(outcome.cursor_changed);
	assert_eq!(recorder.added(), headers.iter().map(|h| h.hash).collect::<Vec<_>>());
	assert!(recorder.removed().is_empty());
	assert_eq!(processor.cursor_hash(), Some(headers.last().unwrap().hash));
}

/// Scenario: the store extends its existing canonical branch by one
/// header between two `advance` calls. Only the new header is added.
#[test]
fn linear_extension_emits_single_add() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(3, 2);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store.clone(), Some(Arc::new(NullLogger)), None).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);
	processor.advance(None).unwrap();

	let tip = headers.last().unwrap();
	let next = Header::child_of(tip, h(999));
	store.extend(next.clone());
	store.set_head(next.hash);

	let before = recorder.added().len();
	let outcome = processor.advance(None).unwrap();

	assert!(outcome.cursor_changed);
	assert_eq!(recorder.added().len(), before + 1);
	assert_eq!(recorder.added().last(), Some(&next.hash));
	assert!(recorder.removed().is_empty());
}

/// Scenario: a depth-1 reorg. The head moves to a sibling of the
/// current tip; the engine should remove the old tip and add the new
/// one.
#[test]
fn depth_one_reorg_removes_old_tip_and_adds_new_one() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(3, 3);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store.clone(), Some(Arc::new(NullLogger)), None).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);
	processor.advance(None).unwrap();

	let parent = &headers[headers.len() - 2];
	let old_tip = headers.last().unwrap();
	let sibling = Header::child_of(parent, h(12345));
	store.extend(sibling.clone());
	store.set_head(sibling.hash);

	let outcome = processor.advance(None).unwrap();

	assert!(outcome.cursor_changed);
	assert_eq!(recorder.removed(), vec![old_tip.hash]);
	assert_eq!(recorder.added().last(), Some(&sibling.hash));
	assert_eq!(processor.cursor_hash(), Some(sibling.hash));
}

/// Scenario: a depth-3 reorg. Three headers are unwound and three new
/// ones (on a sibling branch rooted three headers back) are added, in
/// the correct tip-to-fork / fork-to-tip order.
#[test]
fn depth_three_reorg_unwinds_then_rewinds_in_order() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(5, 4); // genesis + 4
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store.clone(), Some(Arc::new(NullLogger)), None).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);
	processor.advance(None).unwrap();

	let fork_point = &headers[1]; // keep one header past genesis shared
	let b1 = Header::child_of(fork_point, h(91));
	let b2 = Header::child_of(&b1, h(92));
	let b3 = Header::child_of(&b2, h(93));
	store.extend(b1.clone());
	store.extend(b2.clone());
	store.extend(b3.clone());
	store.set_head(b3.hash);

	let outcome = processor.advance(None).unwrap();

	assert!(outcome.cursor_changed);
	let expected_removed: Vec<Hash> = headers[2..].iter().rev().map(|h| h.hash).collect();
	assert_eq!(recorder.removed(), expected_removed);
	assert_eq!(recorder.added(), vec![b1.hash, b2.hash, b3.hash]);
	assert_eq!(processor.cursor_hash(), Some(b3.hash));
}

/// Scenario: cancellation requested mid-unwind. The processor should
/// stop emitting immediately, leave the cursor at its last fully
/// acknowledged position, and report no error.
#[test]
fn cancellation_mid_unwind_leaves_partial_progress() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(5, 5);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store.clone(), Some(Arc::new(NullLogger)), None).unwrap();

	let cancel = CancellationToken::new();
	let cancel_for_handler = cancel.clone();
	let removed = Arc::new(Mutex::new(Vec::new()));
	let removed_for_handler = removed.clone();
	processor.on_remove(move |header| {
		removed_for_handler.lock().unwrap().push(header.hash);
		if removed_for_handler.lock().unwrap().len() == 1 {
			cancel_for_handler.cancel();
		}
		Ok(())
	});
	processor.advance(None).unwrap();

	let fork_point = &headers[1];
	let b1 = Header::child_of(fork_point, h(81));
	let b2 = Header::child_of(&b1, h(82));
	let b3 = Header::child_of(&b2, h(83));
	store.extend(b1.clone());
	store.extend(b2.clone());
	store.extend(b3.clone());
	store.set_head(b3.hash);

	let outcome = processor.advance(Some(&cancel)).unwrap();

	assert!(outcome.cursor_changed);
	assert_eq!(removed.lock().unwrap().len(), 1);
	// Cursor moved back exactly one header from the old tip, and no
	// adds happened yet: unwind was cut short before the rewind phase.
	let old_tip = headers.last().unwrap();
	assert_eq!(
		processor.cursor_hash(),
		Some(headers[headers.len() - 2].hash)
	);
	assert_ne!(processor.cursor_hash(), Some(old_tip.hash));
}

/// Scenario: the store's head jumps to a position with no common
/// ancestor with the cursor (a disjoint fork). `advance` should return
/// `Ok` with no events and no cursor movement rather than failing.
#[test]
fn disjoint_fork_is_non_fatal() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(2, 6);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store.clone(), Some(Arc::new(NullLogger)), None).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);
	processor.advance(None).unwrap();
	let adds_before = recorder.added().len();

	let other_genesis = Header::genesis(h(777));
	store.extend(other_genesis.clone());
	store.set_head(other_genesis.hash);

	let outcome = processor.advance(None).unwrap();

	assert!(!outcome.cursor_changed);
	assert_eq!(recorder.added().len(), adds_before);
	assert!(recorder.removed().is_empty());
	assert_eq!(processor.cursor_hash(), Some(headers.last().unwrap().hash));
}

/// Property: a no-op `advance` (head unchanged since the cursor last
/// caught up) reports `cursor_changed: false` and emits nothing.
#[test]
fn advance_with_unchanged_head_is_a_no_op() {
	let _ = env_logger::init();
	let (store, _headers) = linear_chain(3, 7);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store, Some(Arc::new(NullLogger)), None).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);
	processor.advance(None).unwrap();

	let outcome = processor.advance(None).unwrap();

	assert!(!outcome.cursor_changed);
	assert_eq!(recorder.added().len(), 3);
}

/// Property: a handler failure surfaces as `Error::HandlerFailed` and
/// leaves the cursor exactly where it was before the failing event.
#[test]
fn handler_failure_propagates_and_freezes_cursor() {
	let _ = env_logger::init();
	let (store, _headers) = linear_chain(2, 8);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store, Some(Arc::new(NullLogger)), None).unwrap();
	processor.on_add(|_header| Err("handler exploded".to_string()));

	let err = processor.advance(None).unwrap_err();

	assert!(matches!(err, chainfollow_chain::Error::HandlerFailed(_)));
	assert_eq!(processor.cursor_hash(), None);
}

/// Property: seeding a processor with an explicit `head_hash` skips
/// bootstrap adds for everything up to and including that header.
#[test]
fn seeded_head_skips_bootstrap_adds_up_to_seed() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(4, 9);
	let seed = headers[1].hash;
	let store = Arc::new(store);
	let mut processor =
		ChainProcessor::new(store, Some(Arc::new(NullLogger)), Some(seed)).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);

	processor.advance(None).unwrap();

	assert_eq!(
		recorder.added(),
		headers[2..].iter().map(|h| h.hash).collect::<Vec<_>>()
	);
	assert_eq!(processor.cursor_hash(), Some(headers.last().unwrap().hash));
	assert_eq!(processor.cursor_sequence(), Some(headers.last().unwrap().sequence));
}

/// Property: constructing a processor with a `head_hash` that the
/// store doesn't know about fails rather than silently falling back to
/// `Unseeded`.
#[test]
fn seeding_with_unknown_head_hash_fails() {
	let _ = env_logger::init();
	let (store, _headers) = linear_chain(2, 10);
	let store = Arc::new(store);
	let result = ChainProcessor::new(store, Some(Arc::new(NullLogger)), Some(h(0xdead)));
	assert!(result.is_err());
}

/// Scenario: the store's head regresses to a strict ancestor of the
/// cursor with no competing branch involved (`fork == target`). The
/// engine should still unwind down to that ancestor rather than
/// leaving the cursor stranded ahead of the store's head.
#[test]
fn head_regression_to_a_strict_ancestor_still_unwinds() {
	let _ = env_logger::init();
	let (store, headers) = linear_chain(5, 11);
	let store = Arc::new(store);
	let mut processor = ChainProcessor::new(store.clone(), Some(Arc::new(NullLogger)), None).unwrap();
	let recorder = Recorder::default();
	recorder.attach(&mut processor);
	processor.advance(None).unwrap();

	let ancestor = &headers[1];
	store.set_head(ancestor.hash);

	let outcome = processor.advance(None).unwrap();

	assert!(outcome.cursor_changed);
	let expected_removed: Vec<Hash> = headers[2..].iter().rev().map(|h| h.hash).collect();
	assert_eq!(recorder.removed(), expected_removed);
	assert_eq!(processor.cursor_hash(), Some(ancestor.hash));
	assert_eq!(processor.cursor_sequence(), Some(ancestor.sequence));
}
