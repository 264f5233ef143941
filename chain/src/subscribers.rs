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

//! Event sinks a `ChainProcessor` dispatches to.
//!
//! Handlers are synchronous `FnMut` closures: the spec allows
//! "synchronously or asynchronously", and a plain boxed closure
//! invoked in-line is the simplest faithful realization — a caller
//! that needs to await something in response can still block on it
//! inside the closure, or bridge to a channel of its own.

use chainfollow_core::Header;

/// A handler for `Add`/`Remove` events. Returning `Err` aborts the
/// current event: later handlers of the *same* event are skipped
/// (short-circuit, per the spec's own recommendation) and `advance`
/// returns `Error::HandlerFailed` without moving the cursor past this
/// event.
pub type EventHandler = Box<dyn FnMut(&Header) -> Result<(), String> + Send>;

/// A handler for the supplemental fork-detected notification. Pure
/// telemetry: it cannot fail the pass.
pub type ForkHandler = Box<dyn FnMut(&Header, usize, usize) + Send>;

/// Holds the handlers registered with a `ChainProcessor`, in
/// registration order.
#[derive(Default)]
pub struct Subscribers {
	on_add: Vec<EventHandler>,
	on_remove: Vec<EventHandler>,
	on_fork: Vec<ForkHandler>,
}

impl Subscribers {
	/// Registers a handler to run on every `Add` event, after any
	/// handler already registered.
	pub fn on_add<F>(&mut self, handler: F)
	where
		F: FnMut(&Header) -> Result<(), String> + Send + 'static,
	{
		self.on_add.push(Box::new(handler));
	}

	/// Registers a handler to run on every `Remove` event, after any
	/// handler already registered.
	pub fn on_remove<F>(&mut self, handler: F)
	where
		F: FnMut(&Header) -> Result<(), String> + Send + 'static,
	{
		self.on_remove.push(Box::new(handler));
	}

	/// Registers a handler to run once per reorg pass, before the
	/// unwind phase begins.
	pub fn on_fork<F>(&mut self, handler: F)
	where
		F: FnMut(&Header, usize, usize) + Send + 'static,
	{
		self.on_fork.push(Box::new(handler));
	}

	/// Dispatches an `Add` event to every registered handler, in
	/// order, stopping at the first failure.
	pub fn dispatch_add(&mut self, header: &Header) -> Result<(), String> {
		for handler in self.on_add.iter_mut() {
			handler(header)?;
		}
		Ok(())
	}

	/// Dispatches a `Remove` event to every registered handler, in
	/// order, stopping at the first failure.
	pub fn dispatch_remove(&mut self, header: &Header) -> Result<(), String> {
		for handler in self.on_remove.iter_mut() {
			handler(header)?;
		}
		Ok(())
	}

	/// Notifies every registered fork handler. `unwind_depth` and
	/// `rewind_depth` count headers strictly above the fork point on
	/// each branch.
	pub fn dispatch_fork(&mut self, fork: &Header, unwind_depth: usize, rewind_depth: usize) {
		for handler in self.on_fork.iter_mut() {
			handler(fork, unwind_depth, rewind_depth);
		}
	}
}
