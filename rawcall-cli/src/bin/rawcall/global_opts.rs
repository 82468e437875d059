/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use rawcall::Context;
use rawcall::Error;
use tracing::metadata::LevelFilter;

use super::tracing::init_file_tracing;
use super::tracing::init_stderr_tracing;

/// Options that control rawcall itself rather than the call it makes. They
/// must come before the call number.
#[derive(Debug, Parser, Clone)]
pub struct GlobalOpts {
    /// The verbosity level of log output.
    #[clap(long, value_name = "LEVEL", env = "RAWCALL_LOG")]
    pub log: Option<LevelFilter>,

    /// Log to a file instead of the terminal.
    #[clap(long, value_name = "FILE", env = "RAWCALL_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Initializes tracing. File logging goes through a background writer that
    /// is flushed when the returned guard is dropped.
    pub fn init_tracing(&self) -> Result<Option<impl Drop + use<>>, Error> {
        if let Some(path) = &self.log_file {
            let file_writer = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Ok(Some(init_file_tracing(self.log, file_writer)))
        } else {
            init_stderr_tracing(self.log);
            Ok(None)
        }
    }
}
