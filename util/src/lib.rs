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

//! Logging, cancellation, and other low-level patterns factored out
//! because they're common to every crate in the workspace.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

pub mod cancellation;
pub mod hex;
pub mod logger;
pub mod types;

pub use cancellation::CancellationToken;
pub use hex::{from_hex, to_hex};
pub use logger::{init_logger, init_test_logger};
pub use types::{LogLevel, LoggingConfig};
