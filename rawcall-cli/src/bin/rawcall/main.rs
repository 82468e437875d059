/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

mod global_opts;
mod tracing;

use std::env;
use std::ffi::OsString;
use std::io;
use std::io::Write;
use std::process;

use clap::AppSettings;
use clap::Parser;
use colored::*;
use rawcall::ArgVector;
use rawcall::Context;
use rawcall::Error;

use self::global_opts::GlobalOpts;

/// Make a raw system call. Every call is shown in full and must be confirmed
/// with `y` before it is made; the kernel's return value is printed as is.
#[derive(Debug, Parser)]
#[clap(name = "rawcall", version, setting = AppSettings::TrailingVarArg)]
struct Args {
    #[clap(flatten)]
    global: GlobalOpts,

    /// The call number followed by up to six arguments. Each is a decimal
    /// integer, a 0x-prefixed hex integer, or -A STRING (also -ASTRING) for
    /// the address of STRING.
    #[clap(value_name = "ARG", value_parser, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

fn main() {
    let Args { global, args } = Args::parse();

    let code = run(&global, args).unwrap_or_else(|err| {
        display_error(err);
        1
    });

    process::exit(code);
}

fn run(global: &GlobalOpts, args: Vec<OsString>) -> Result<i32, Error> {
    let _guard = global.init_tracing()?;

    if args.is_empty() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(usage().as_bytes())?;
        stdout.flush()?;
        return Ok(1);
    }

    let vector = ArgVector::parse(args)?;

    let confirmed = rawcall::confirm(&vector, io::stdin().lock(), io::stdout().lock())
        .context("Failed to show the confirmation prompt")?;

    if !confirmed {
        process::abort();
    }

    // SAFETY: the operator has just confirmed this exact call.
    let result = unsafe { rawcall::execute(&vector) };

    let mut stdout = io::stdout().lock();
    stdout.write_all(rawcall::render_result(result).as_bytes())?;
    stdout.flush()?;

    Ok(0)
}

fn usage() -> String {
    let prog = env::args_os()
        .next()
        .map_or_else(|| "rawcall".to_owned(), |p| p.to_string_lossy().into_owned());

    format!(
        "{0} - make a system call\nUsage: {0} [ULONG | 0xHEXULONG | -A CARRAY] ...\n",
        prog
    )
}

fn display_error(error: Error) {
    let mut chain = error.chain();

    if let Some(error) = chain.next() {
        eprintln!("{}: {}", "Error".red().bold(), error);
    }

    for cause in chain {
        eprintln!("     {} {}", ">".dimmed().bold(), cause);
    }
}
