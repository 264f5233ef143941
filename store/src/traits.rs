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

//! The two interfaces the reorg engine consumes: a chain store and a
//! fork finder. Both are ordinary traits so the engine stays agnostic
//! to whatever persistent store backs a given node (lmdb, rocksdb, a
//! remote RPC peer, ...) — this crate ships only an in-memory
//! reference implementation, see [`crate::memory`].

use chainfollow_core::{Hash, Header};

use crate::error::Error;

/// Read access to the mutable chain of headers. Implementations may
/// have their head move to an entirely different branch between any
/// two calls; the reorg engine is built to absorb exactly that.
pub trait ChainStore: Send + Sync {
	/// The first header of the chain. Constant for the store's
	/// lifetime.
	fn genesis(&self) -> Header;

	/// The currently canonical tip. May change from one call to the
	/// next but each individual call returns a self-consistent header.
	fn head(&self) -> Header;

	/// Looks up a header by hash.
	fn get_header(&self, hash: &Hash) -> Option<Header>;

	/// Walks backward along parent pointers from `start` toward
	/// `stop`, an ancestor of `start`. Yields `start` first and `stop`
	/// last. `inclusive` is a hint to the caller about whether it
	/// intends to keep the `stop` header in its own edit script or
	/// filter it out — the store always yields it; see the reorg
	/// engine's own "skip the fork header" rule for where that
	/// filtering actually happens.
	fn iterate_from<'a>(
		&'a self,
		start: &Hash,
		stop: &Hash,
		inclusive: bool,
	) -> Box<dyn Iterator<Item = Result<Header, Error>> + 'a>;

	/// Walks forward along the canonical chain from `start` to `stop`,
	/// a descendant of `start` on the branch that was canonical at the
	/// time of the call. Yields `start` first and `stop` last.
	fn iterate_to<'a>(
		&'a self,
		start: &Hash,
		stop: &Hash,
		inclusive: bool,
	) -> Box<dyn Iterator<Item = Result<Header, Error>> + 'a>;
}

/// The result of resolving the lowest common ancestor of two chain
/// positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ForkResult {
	/// The lowest header that is an ancestor of both positions. `None`
	/// only when the two positions belong to disjoint trees.
	pub fork: Option<Header>,
	/// True iff `fork` is exactly one of the two input positions, i.e.
	/// one position is a direct ancestor of the other and no removal
	/// is required to get from one to the other.
	pub is_linear: bool,
}

/// Finds the fork point between two chain positions. May be
/// implemented directly on a `ChainStore`, as it is here.
pub trait ForkFinder: Send + Sync {
	/// Computes the lowest common ancestor of `a` and `b`.
	fn find_fork(&self, a: &Header, b: &Header) -> ForkResult;
}
