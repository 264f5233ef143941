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

//! The chain-following reorg engine itself.

use std::sync::Arc;

use chainfollow_core::{Hash, Header};
use chainfollow_store::{ChainStore, ForkFinder};
use chainfollow_util::CancellationToken;

use crate::cursor::Cursor;
use crate::error::Error;
use crate::logger::{ReorgLogger, StandardLogger};
use crate::subscribers::Subscribers;

/// What `advance` did during one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
	/// Whether the cursor moved relative to its value when `advance`
	/// was called.
	pub cursor_changed: bool,
}

/// Diffs a `ChainStore`'s current head against its own cursor on each
/// `advance` call, and emits a causally correct sequence of `Remove`
/// then `Add` events across that diff.
///
/// Not reentrant: `advance` takes `&mut self`, so the borrow checker
/// itself enforces the spec's "callers must serialize calls"
/// contract — a caller that needs to share a processor across tasks
/// has to wrap it in its own mutex, exactly as the spec anticipates
/// ("e.g. via an outer mutex").
pub struct ChainProcessor<S> {
	store: Arc<S>,
	logger: Arc<dyn ReorgLogger>,
	cursor: Cursor,
	subscribers: Subscribers,
}

impl<S> ChainProcessor<S>
where
	S: ChainStore + ForkFinder,
{
	/// Builds a processor against `chain`. If `head_hash` is given, the
	/// cursor is seeded directly to it — the caller is asserting it has
	/// already observed every header from genesis up to and including
	/// that hash, so no bootstrap `Add` events will be emitted for
	/// them. Fails if `head_hash` doesn't resolve in `chain`.
	pub fn new(
		chain: Arc<S>,
		logger: Option<Arc<dyn ReorgLogger>>,
		head_hash: Option<Hash>,
	) -> Result<ChainProcessor<S>, Error> {
		let cursor = match head_hash {
			None => Cursor::Unseeded,
			Some(hash) => {
				let header = chain.get_header(&hash).ok_or_else(|| {
					Error::StoreInconsistent(format!(
						"seed head_hash {:?} not found in chain store",
						hash
					))
				})?;
				Cursor::At {
					hash: header.hash,
					sequence: header.sequence,
				}
			}
		};

		Ok(ChainProcessor {
			store: chain,
			logger: logger.unwrap_or_else(|| Arc::new(StandardLogger)),
			cursor,
			subscribers: Subscribers::default(),
		})
	}

	/// Registers a handler to run on every `Add` event.
	pub fn on_add<F>(&mut self, handler: F)
	where
		F: FnMut(&Header) -> Result<(), String> + Send + 'static,
	{
		self.subscribers.on_add(handler);
	}

	/// Registers a handler to run on every `Remove` event.
	pub fn on_remove<F>(&mut self, handler: F)
	where
		F: FnMut(&Header) -> Result<(), String> + Send + 'static,
	{
		self.subscribers.on_remove(handler);
	}

	/// Registers a handler to run once per reorg pass, before the
	/// unwind phase begins.
	pub fn on_fork<F>(&mut self, handler: F)
	where
		F: FnMut(&Header, usize, usize) + Send + 'static,
	{
		self.subscribers.on_fork(handler);
	}

	/// The cursor's hash, or `None` if no `advance` has ever completed
	/// a single event.
	pub fn cursor_hash(&self) -> Option<Hash> {
		self.cursor.hash()
	}

	/// The cursor's sequence, or `None` if no `advance` has ever
	/// completed a single event.
	pub fn cursor_sequence(&self) -> Option<u64> {
		self.cursor.sequence()
	}

	/// Performs one reconciliation pass: diffs the cursor against the
	/// store's current head and emits the causally correct sequence of
	/// events to get from one to the other.
	pub fn advance(&mut self, cancel: Option<&CancellationToken>) -> Result<AdvanceOutcome, Error> {
		let old_cursor = self.cursor;

		if let Cursor::Unseeded = self.cursor {
			let genesis = self.store.genesis();
			self.emit_add(&genesis)?;
			self.cursor = Cursor::At {
				hash: genesis.hash,
				sequence: genesis.sequence,
			};
		}

		// Single head sample for the whole pass: re-sampling mid-pass
		// would let the fork computation reference a head our
		// iterators never actually reach.
		let target = self.store.head();

		if Some(target.hash) == self.cursor.hash() {
			return Ok(AdvanceOutcome { cursor_changed: old_cursor != self.cursor });
		}

		let current_hash = self
			.cursor
			.hash()
			.expect("cursor was seeded above if it was Unseeded");
		let current = self.store.get_header(&current_hash).ok_or_else(|| {
			Error::StoreInconsistent(format!("cursor header {:?} missing from store", current_hash))
		})?;

		let fork_result = self.store.find_fork(&current, &target);
		let fork = match fork_result.fork {
			Some(f) => f,
			None => {
				self.logger.warn(&format!(
					"no common ancestor between cursor {:?} and head {:?}; treating as no progress",
					current.hash, target.hash
				));
				return Ok(AdvanceOutcome { cursor_changed: old_cursor != self.cursor });
			}
		};

		// Whether there's anything to unwind/rewind is determined by
		// comparing directly against the fork point, not by
		// `fork_result.is_linear` alone: `is_linear` is also true when
		// `fork == target` (the store's head regressed to a strict
		// ancestor of the cursor, with no competing branch involved),
		// and that case still needs a full unwind down to the fork —
		// only the rewind is a no-op there. Gating the unwind loop on
		// `!is_linear` would silently leave the cursor stuck ahead of
		// the store's head in that scenario, violating "the cursor
		// equals the store's head after a completed advance".
		let needs_unwind = current.hash != fork.hash;
		let needs_rewind = target.hash != fork.hash;

		if needs_unwind {
			let unwind_depth = (current.sequence - fork.sequence) as usize;
			let rewind_depth = (target.sequence - fork.sequence) as usize;
			self.logger.info(&format!(
				"{}: fork at {:?} (seq {}), unwinding {} header(s), rewinding {} header(s)",
				if needs_rewind { "reorganizing" } else { "head regressed" },
				fork.hash, fork.sequence, unwind_depth, rewind_depth
			));
			self.subscribers.dispatch_fork(&fork, unwind_depth, rewind_depth);

			for item in self.store.iterate_from(&current.hash, &fork.hash, false) {
				let header = item?;
				if header.hash == fork.hash {
					continue;
				}
				if is_cancelled(cancel) {
					return Ok(AdvanceOutcome { cursor_changed: old_cursor != self.cursor });
				}
				self.emit_remove(&header)?;
				self.cursor = Cursor::At {
					hash: header.previous_hash,
					sequence: header.sequence - 1,
				};
			}

			self.logger.info(&format!(
				"unwind complete, cursor at {:?}",
				self.cursor.hash()
			));
		}

		if needs_rewind {
			for item in self.store.iterate_to(&fork.hash, &target.hash, false) {
				let header = item?;
				if header.hash == fork.hash {
					continue;
				}
				if is_cancelled(cancel) {
					return Ok(AdvanceOutcome { cursor_changed: old_cursor != self.cursor });
				}
				self.emit_add(&header)?;
				self.cursor = Cursor::At {
					hash: header.hash,
					sequence: header.sequence,
				};
			}

			if needs_unwind {
				self.logger.info(&format!(
					"reorg complete, cursor at {:?}",
					self.cursor.hash()
				));
			}
		}

		Ok(AdvanceOutcome { cursor_changed: old_cursor != self.cursor })
	}

	fn emit_add(&mut self, header: &Header) -> Result<(), Error> {
		self.logger.debug(&format!("add {:?} (seq {})", header.hash, header.sequence));
		self.subscribers
			.dispatch_add(header)
			.map_err(Error::HandlerFailed)
	}

	fn emit_remove(&mut self, header: &Header) -> Result<(), Error> {
		self.logger.debug(&format!("remove {:?} (seq {})", header.hash, header.sequence));
		self.subscribers
			.dispatch_remove(header)
			.map_err(Error::HandlerFailed)
	}
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
	cancel.map(|t| t.is_cancelled()).unwrap_or(false)
}
