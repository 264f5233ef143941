// Copyright 2016 The Grin Developers
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

//! The header type the reorg engine walks. Deliberately minimal: the
//! engine only ever reads `hash`, `previous_hash` and `sequence`.

use serde::{Deserialize, Serialize};

use crate::hash::{Hash, ZERO_HASH};

/// A block header, as seen by the chain-following engine. Consensus
/// fields (work, timestamp, commitments, proof data, ...) live in the
/// `payload`, which the engine never inspects.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Header {
	/// Identifies this header.
	pub hash: Hash,
	/// Identifies the parent header. `ZERO_HASH` for genesis.
	pub previous_hash: Hash,
	/// Monotonically increasing height; 1 at genesis.
	pub sequence: u64,
	/// Opaque payload the engine never reads (consensus fields,
	/// commitments, timestamps, and the like belong here).
	pub payload: Vec<u8>,
}

impl Header {
	/// Builds a genesis header: sequence 1, `ZERO_HASH` as parent.
	pub fn genesis(hash: Hash) -> Header {
		Header {
			hash,
			previous_hash: ZERO_HASH,
			sequence: 1,
			payload: Vec::new(),
		}
	}

	/// Builds a header extending `previous` by one.
	pub fn child_of(previous: &Header, hash: Hash) -> Header {
		Header {
			hash,
			previous_hash: previous.hash,
			sequence: previous.sequence + 1,
			payload: Vec::new(),
		}
	}

	/// Whether this header has no parent (`previous_hash == ZERO_HASH`).
	pub fn is_genesis(&self) -> bool {
		self.previous_hash == ZERO_HASH
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn genesis_has_sequence_one_and_zero_parent() {
		let g = Header::genesis(Hash::from_u64(0));
		assert_eq!(g.sequence, 1);
		assert!(g.is_genesis());
	}

	#[test]
	fn child_of_increments_sequence_and_links_parent() {
		let g = Header::genesis(Hash::from_u64(0));
		let a1 = Header::child_of(&g, Hash::from_u64(1));
		assert_eq!(a1.sequence, 2);
		assert_eq!(a1.previous_hash, g.hash);
		assert!(!a1.is_genesis());
	}
}
