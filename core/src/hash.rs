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

//! Fixed-width header identifiers.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

/// A fixed-width 32-byte identifier for a header. Equality is bytewise;
/// the engine never computes this value itself, only compares and
/// forwards it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

/// Sentinel previous-hash for a genesis header.
pub const ZERO_HASH: Hash = Hash([0; 32]);

impl Hash {
	/// Builds a `Hash` from a byte slice, panicking if the slice isn't
	/// exactly 32 bytes. Intended for test fixtures.
	pub fn from_slice(bytes: &[u8]) -> Hash {
		let mut a = [0u8; 32];
		a.copy_from_slice(bytes);
		Hash(a)
	}

	/// Builds a deterministic test fixture hash from a small integer,
	/// useful for constructing fixture chains without hand-writing
	/// 32-byte arrays.
	pub fn from_u64(n: u64) -> Hash {
		let mut a = [0u8; 32];
		(&mut a[24..]).write_all(&n.to_be_bytes()).unwrap();
		Hash(a)
	}

	/// The raw bytes of this hash.
	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}
}

impl fmt::Display for Hash {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for byte in self.0.iter() {
			write!(f, "{:02x}", byte)?;
		}
		Ok(())
	}
}

impl fmt::Debug for Hash {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Hash({})", self)
	}
}
