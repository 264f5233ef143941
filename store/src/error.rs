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

//! Error type for the chain store interface.

use chainfollow_core::Hash;

/// Errors a `ChainStore` implementation can report back to a caller.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
	/// No header is stored under this hash.
	#[error("header not found: {0}")]
	NotFound(Hash),
	/// An iterator was asked to walk between two headers that aren't in
	/// the expected ancestor/descendant relationship.
	#[error("{start} is not a descendant of {stop}")]
	NotAncestor {
		/// The header the walk was supposed to start from.
		start: Hash,
		/// The header the walk was supposed to stop at.
		stop: Hash,
	},
}
