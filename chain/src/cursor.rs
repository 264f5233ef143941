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

//! The engine's recorded position on the chain.

use chainfollow_core::Hash;

/// The last header the engine has fully emitted, as a `(hash,
/// sequence)` pair rather than a header reference — this keeps the
/// engine decoupled from header payload lifetime and avoids dangling
/// references if the store garbage-collects an abandoned branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
	/// No events have been emitted yet.
	Unseeded,
	/// The engine has fully emitted everything up to and including
	/// this header.
	At {
		/// The header's hash.
		hash: Hash,
		/// The header's sequence number.
		sequence: u64,
	},
}

impl Cursor {
	/// The cursor's hash, or `None` if `Unseeded`.
	pub fn hash(&self) -> Option<Hash> {
		match self {
			Cursor::Unseeded => None,
			Cursor::At { hash, .. } => Some(*hash),
		}
	}

	/// The cursor's sequence, or `None` if `Unseeded`.
	pub fn sequence(&self) -> Option<u64> {
		match self {
			Cursor::Unseeded => None,
			Cursor::At { sequence, .. } => Some(*sequence),
		}
	}
}

impl Default for Cursor {
	fn default() -> Cursor {
		Cursor::Unseeded
	}
}
