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

//! Error taxonomy for the reorg engine.
//!
//! Only two kinds ever surface as `Err`: [`Error::StoreInconsistent`]
//! and [`Error::HandlerFailed`]. The other two entries of the table in
//! the design notes — a disjoint fork and a cancelled pass — are
//! recoverable by definition, so `advance` reports them through its
//! `Ok` return value instead (see [`crate::processor::AdvanceOutcome`]).

/// Errors `advance` can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The store's own invariants were violated relative to the
	/// cursor: either the cursor's header has vanished, or an iterator
	/// walked off the end of its branch without reaching the header it
	/// was aimed at. Fatal — the cursor's universe is broken and the
	/// cursor is left untouched.
	#[error("chain store is inconsistent: {0}")]
	StoreInconsistent(String),

	/// A subscriber returned an error while acknowledging an event.
	/// The cursor is left at its pre-emission value; by the time this
	/// is returned, the engine has not yet claimed to be anywhere it
	/// hasn't verified the handlers agree with.
	#[error("event handler failed: {0}")]
	HandlerFailed(String),
}

impl From<chainfollow_store::Error> for Error {
	fn from(e: chainfollow_store::Error) -> Error {
		Error::StoreInconsistent(e.to_string())
	}
}
