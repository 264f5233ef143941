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

//! Cooperative cancellation flag, generalized from the `Arc<AtomicBool>`
//! stop signal pattern used throughout the server and mining loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply cloneable, cooperative cancellation flag. Checked, never
/// enforced: a long-running operation observes `is_cancelled()` at its
/// own suspension points and decides how to unwind.
#[derive(Clone, Default)]
pub struct CancellationToken {
	flag: Arc<AtomicBool>,
}

impl CancellationToken {
	/// Builds a fresh, not-yet-cancelled token.
	pub fn new() -> CancellationToken {
		CancellationToken {
			flag: Arc::new(AtomicBool::new(false)),
		}
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		self.flag.store(true, Ordering::SeqCst);
	}

	/// Whether cancellation has been requested.
	pub fn is_cancelled(&self) -> bool {
		self.flag.load(Ordering::SeqCst)
	}
}
