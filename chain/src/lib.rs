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

//! Linearizes a mutable DAG of block headers into a causally correct
//! stream of add/remove events, following whatever reorgs the
//! underlying [`chainfollow_store::ChainStore`] goes through.
//!
//! The entry point is [`ChainProcessor`]: construct one against a
//! store, register handlers with `on_add`/`on_remove`/`on_fork`, and
//! call `advance` whenever the store's head may have moved.

#![deny(unused_extern_crates)]
#![warn(missing_docs)]

mod cursor;
mod error;
mod logger;
mod processor;
mod subscribers;

pub use crate::cursor::Cursor;
pub use crate::error::Error;
pub use crate::logger::{NullLogger, ReorgLogger, StandardLogger};
pub use crate::processor::{AdvanceOutcome, ChainProcessor};
pub use crate::subscribers::{EventHandler, ForkHandler, Subscribers};
