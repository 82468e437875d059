/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Builds the argument vector for a raw system call from command-line tokens,
//! asks the operator to confirm it, and issues the call.

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

mod args;
mod dispatch;
mod error;

pub use args::ArgError;
pub use args::ArgVector;
pub use args::SLOTS;
pub use args::TOKENS;
pub use dispatch::confirm;
pub use dispatch::execute;
pub use dispatch::preview;
pub use dispatch::render_result;
pub use error::Context;
pub use error::Error;
