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

//! An in-memory `ChainStore`/`ForkFinder` implementation. Exists to
//! drive the reorg engine in tests and to document the contract a real
//! persistent store (lmdb, rocksdb, ...) has to uphold; the persistent
//! store's own on-disk layout is out of scope for this crate.

use std::collections::HashMap;
use std::sync::RwLock;

use chainfollow_core::{Hash, Header};

use crate::error::Error;
use crate::traits::{ChainStore, ForkFinder, ForkResult};

struct Inner {
	headers: HashMap<Hash, Header>,
	/// height-ordered hashes of the currently canonical branch;
	/// `canonical[i]` has sequence `i + genesis.sequence`.
	canonical: Vec<Hash>,
	genesis: Hash,
	head: Hash,
}

/// An in-memory store backed by a hash map of every header ever seen
/// plus an index of the currently canonical branch. Headers are never
/// evicted, so every past branch remains walkable — this is what lets
/// [`ChainStore::iterate_from`] unwind an abandoned fork no matter how
/// long ago the store's head moved away from it.
pub struct MemoryChainStore {
	inner: RwLock<Inner>,
}

impl MemoryChainStore {
	/// Builds a store containing only `genesis`, which becomes both
	/// the genesis header and the initial head.
	pub fn new(genesis: Header) -> MemoryChainStore {
		let mut headers = HashMap::new();
		let genesis_hash = genesis.hash;
		headers.insert(genesis_hash, genesis);
		MemoryChainStore {
			inner: RwLock::new(Inner {
				headers,
				canonical: vec![genesis_hash],
				genesis: genesis_hash,
				head: genesis_hash,
			}),
		}
	}

	/// Records `header` in the store without changing the current
	/// head. Used to script forks: build the abandoned branch's
	/// headers here, then call [`MemoryChainStore::set_head`] on the
	/// winning branch's tip.
	pub fn extend(&self, header: Header) {
		let mut inner = self.inner.write().unwrap();
		inner.headers.insert(header.hash, header);
	}

	/// Moves the head to `hash`, which must already have been recorded
	/// via [`MemoryChainStore::extend`] (or be the genesis). Walks
	/// parent pointers back looking for this store's actual genesis
	/// (`inner.genesis`) and, if found, rebuilds the canonical index
	/// from that path.
	///
	/// `hash` is allowed to head a disjoint tree — its own root simply
	/// won't be `inner.genesis`, in which case the canonical index is
	/// left untouched (nothing will ever walk it; a disjoint head is
	/// caught by `find_fork` returning no common ancestor). Panics only
	/// if the walk runs off a dangling parent pointer, i.e. a header
	/// references a previous hash that was never `extend`-ed and isn't
	/// itself a root — a genuine store inconsistency rather than a
	/// disjoint tree.
	pub fn set_head(&self, hash: Hash) {
		let mut inner = self.inner.write().unwrap();
		let mut path = Vec::new();
		let mut cursor = hash;
		let mut reached_genesis = false;
		loop {
			let header = inner
				.headers
				.get(&cursor)
				.unwrap_or_else(|| panic!("set_head: unknown header {:?}", cursor))
				.clone();
			path.push(cursor);
			if cursor == inner.genesis {
				reached_genesis = true;
				break;
			}
			if header.is_genesis() {
				// Rootless but not this store's genesis: `hash` heads a
				// disjoint tree. Its sentinel parent was never recorded,
				// so stop here instead of chasing it into a panic.
				break;
			}
			cursor = header.previous_hash;
		}
		if reached_genesis {
			path.reverse();
			log::debug!("set_head: {:?} -> {:?}, canonical length {}", inner.head, hash, path.len());
			inner.canonical = path;
		} else {
			log::warn!(
				"set_head: {:?} does not descend from store genesis {:?}; treating as a disjoint head",
				hash, inner.genesis
			);
		}
		inner.head = hash;
	}

	fn header(&self, hash: &Hash) -> Option<Header> {
		self.inner.read().unwrap().headers.get(hash).cloned()
	}
}

impl ChainStore for MemoryChainStore {
	fn genesis(&self) -> Header {
		let inner = self.inner.read().unwrap();
		inner.headers.get(&inner.genesis).unwrap().clone()
	}

	fn head(&self) -> Header {
		let inner = self.inner.read().unwrap();
		inner.headers.get(&inner.head).unwrap().clone()
	}

	fn get_header(&self, hash: &Hash) -> Option<Header> {
		self.header(hash)
	}

	fn iterate_from<'a>(
		&'a self,
		start: &Hash,
		stop: &Hash,
		_inclusive: bool,
	) -> Box<dyn Iterator<Item = Result<Header, Error>> + 'a> {
		Box::new(BackwardIter {
			store: self,
			stop: *stop,
			next: Some(*start),
			done: false,
		})
	}

	fn iterate_to<'a>(
		&'a self,
		start: &Hash,
		stop: &Hash,
		_inclusive: bool,
	) -> Box<dyn Iterator<Item = Result<Header, Error>> + 'a> {
		let inner = self.inner.read().unwrap();
		let start_header = match inner.headers.get(start) {
			Some(h) => h.clone(),
			None => {
				return Box::new(std::iter::once(Err(Error::NotFound(*start))));
			}
		};
		let stop_header = match inner.headers.get(stop) {
			Some(h) => h.clone(),
			None => {
				return Box::new(std::iter::once(Err(Error::NotFound(*stop))));
			}
		};

		let start_idx = inner
			.canonical
			.iter()
			.position(|h| h == start);
		let stop_idx = inner.canonical.iter().position(|h| h == stop);

		match (start_idx, stop_idx) {
			(Some(s), Some(e)) if s <= e => {
				let slice: Vec<Header> = inner.canonical[s..=e]
					.iter()
					.map(|h| inner.headers.get(h).unwrap().clone())
					.collect();
				Box::new(slice.into_iter().map(Ok))
			}
			_ => Box::new(std::iter::once(Err(Error::NotAncestor {
				start: start_header.hash,
				stop: stop_header.hash,
			}))),
		}
	}
}

/// Lazily walks parent pointers from `next` down to (and including)
/// `stop`. Stops with a `NotAncestor` error if it runs off the start of
/// the chain (genesis) without ever reaching `stop`.
struct BackwardIter<'a> {
	store: &'a MemoryChainStore,
	stop: Hash,
	next: Option<Hash>,
	done: bool,
}

impl<'a> Iterator for BackwardIter<'a> {
	type Item = Result<Header, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		let hash = self.next?;
		let header = match self.store.header(&hash) {
			Some(h) => h,
			None => {
				self.done = true;
				return Some(Err(Error::NotFound(hash)));
			}
		};

		if hash == self.stop {
			self.done = true;
		} else if header.is_genesis() {
			// Ran off the start of the chain without reaching `stop`.
			self.done = true;
			self.next = None;
			return Some(Err(Error::NotAncestor {
				start: hash,
				stop: self.stop,
			}));
		} else {
			self.next = Some(header.previous_hash);
		}

		Some(Ok(header))
	}
}

impl ForkFinder for MemoryChainStore {
	fn find_fork(&self, a: &Header, b: &Header) -> ForkResult {
		let inner = self.inner.read().unwrap();

		let mut x = a.clone();
		let mut y = b.clone();

		while x.sequence > y.sequence {
			match inner.headers.get(&x.previous_hash) {
				Some(p) => x = p.clone(),
				None => return ForkResult { fork: None, is_linear: false },
			}
		}
		while y.sequence > x.sequence {
			match inner.headers.get(&y.previous_hash) {
				Some(p) => y = p.clone(),
				None => return ForkResult { fork: None, is_linear: false },
			}
		}

		while x.hash != y.hash {
			let x_parent = inner.headers.get(&x.previous_hash).cloned();
			let y_parent = inner.headers.get(&y.previous_hash).cloned();
			match (x_parent, y_parent) {
				(Some(xp), Some(yp)) => {
					x = xp;
					y = yp;
				}
				_ => return ForkResult { fork: None, is_linear: false },
			}
		}

		let is_linear = x.hash == a.hash || x.hash == b.hash;
		ForkResult {
			fork: Some(x),
			is_linear,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chainfollow_core::Hash as H;

	fn genesis() -> Header {
		Header::genesis(H::from_u64(0))
	}

	#[test]
	fn fresh_store_head_is_genesis() {
		let _ = env_logger::init();
		let g = genesis();
		let store = MemoryChainStore::new(g.clone());
        assert_eq!(store.head(), g);
        assert_eq!(store.genesis(), g);
	}

	#[test]
	fn linear_extension_finds_fork_at_current() {
		let _ = env_logger::init();
		let g = genesis();
		let a1 = Header::child_of(&g, H::from_u64(1));
		let store = MemoryChainStore::new(g.clone());
		store.extend(a1.clone());
		store.set_head(a1.hash);

		let result = store.find_fork(&g, &a1);
		assert!(result.is_linear);
		assert_eq!(result.fork.unwrap().hash, g.hash);
	}

	#[test]
	fn disjoint_trees_have_no_fork() {
		let _ = env_logger::init();
		let g1 = Header::genesis(H::from_u64(0));
		let g2 = Header::genesis(H::from_u64(99));
		let store = MemoryChainStore::new(g1.clone());
		store.extend(g2.clone());

		let result = store.find_fork(&g1, &g2);
		assert!(result.fork.is_none());
	}

	#[test]
	fn backward_iterator_yields_stop_header() {
		let _ = env_logger::init();
		let g = genesis();
		let a1 = Header::child_of(&g, H::from_u64(1));
		let a2 = Header::child_of(&a1, H::from_u64(2));
		let store = MemoryChainStore::new(g.clone());
		store.extend(a1.clone());
		store.extend(a2.clone());
		store.set_head(a2.hash);

		let walked: Vec<Header> = store
			.iterate_from(&a2.hash, &g.hash, false)
			.map(|r| r.unwrap())
			.collect();
		assert_eq!(walked, vec![a2, a1, g]);
	}

	#[test]
	fn forward_iterator_walks_canonical_chain() {
		let _ = env_logger::init();
		let g = genesis();
		let a1 = Header::child_of(&g, H::from_u64(1));
		let a2 = Header::child_of(&a1, H::from_u64(2));
		let store = MemoryChainStore::new(g.clone());
		store.extend(a1.clone());
		store.extend(a2.clone());
		store.set_head(a2.hash);

		let walked: Vec<Header> = store
			.iterate_to(&g.hash, &a2.hash, false)
			.map(|r| r.unwrap())
			.collect();
		assert_eq!(walked, vec![g, a1, a2]);
	}

	#[test]
	fn set_head_accepts_a_disjoint_tree_without_panicking() {
		let _ = env_logger::init();
		let g = genesis();
		let store = MemoryChainStore::new(g.clone());

		let other_genesis = Header::genesis(H::from_u64(777));
		store.extend(other_genesis.clone());
		store.set_head(other_genesis.hash);

		assert_eq!(store.head(), other_genesis);
	}
}
