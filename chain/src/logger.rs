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

//! The logger a `ChainProcessor` is constructed with. A trait object
//! rather than the workspace's usual global `log` facade, because the
//! engine is explicitly constructed with "an optional logger" per its
//! own contract — callers that want per-instance log routing (tests
//! capturing output in memory, multiple processors tagged
//! differently) need an injection point, the same role grin's
//! `ChainAdapter` trait plays for block-accepted notifications.

/// Sink for the handful of things the reorg engine itself logs:
/// reorg start/completion and unwind depth.
pub trait ReorgLogger: Send + Sync {
	/// Informational message: reorg start/completion.
	fn info(&self, msg: &str);
	/// A disjoint-fork condition or other recoverable anomaly.
	fn warn(&self, msg: &str);
	/// Per-event tracing, useful when debugging a stuck sync driver.
	fn debug(&self, msg: &str);
}

/// Forwards to the workspace's shared `log` facade, under the
/// `chainfollow_chain` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardLogger;

impl ReorgLogger for StandardLogger {
	fn info(&self, msg: &str) {
		log::info!("{}", msg);
	}

	fn warn(&self, msg: &str) {
		log::warn!("{}", msg);
	}

	fn debug(&self, msg: &str) {
		log::debug!("{}", msg);
	}
}

/// Discards everything. Handy for tests that don't care about log
/// output and don't want to pay for formatting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl ReorgLogger for NullLogger {
	fn info(&self, _msg: &str) {}
	fn warn(&self, _msg: &str) {}
	fn debug(&self, _msg: &str) {}
}
