/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;
use std::io::Read;
use std::io::Write;

use hexword::Word;
use nix::errno::Errno;
use syscalls::Sysno;
use tracing::debug;
use tracing::info;

use crate::args::ArgVector;

/// The line shown to the operator before anything happens, e.g.
/// ``Execute `syscall(0x0000000000000027, 0x0000000000000000, ...)`? [Y/n] ``.
pub fn preview(vector: &ArgVector) -> String {
    let words = vector
        .words()
        .iter()
        .map(|&slot| Word(slot).to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!("Execute `syscall({})`? [Y/n] ", words)
}

/// Writes the preview to `output` and reads a single byte from `input`.
///
/// Returns `Ok(true)` only for `y` or `Y`. End of input and read errors count
/// as a refusal; failing to write the prompt is an error.
pub fn confirm<R, W>(vector: &ArgVector, mut input: R, mut output: W) -> io::Result<bool>
where
    R: Read,
    W: Write,
{
    output.write_all(preview(vector).as_bytes())?;
    output.flush()?;

    let mut answer = [0u8; 1];
    let confirmed = matches!(input.read(&mut answer), Ok(1) if answer[0].eq_ignore_ascii_case(&b'y'));

    debug!(confirmed, "operator answered {:?}", answer[0] as char);
    Ok(confirmed)
}

/// Issues the system call described by `vector` and returns the kernel's raw
/// result. Nothing about the result is interpreted.
///
/// # Safety
///
/// The call number and arguments are arbitrary. The call may write through
/// any of the words as if they were pointers, unmap memory, or terminate the
/// process. The caller must have had the operator confirm the exact call.
pub unsafe fn execute(vector: &ArgVector) -> isize {
    let number = vector.number();

    match Sysno::new(number) {
        Some(sysno) => info!(%sysno, "dispatching {}", preview_args(vector)),
        None => info!(number, "dispatching unknown call {}", preview_args(vector)),
    }

    let result = unsafe {
        // `-A` slots become raw addresses here. The buffers belong to
        // `vector`, which outlives the call.
        let [number, a, b, c, d, e, f] = vector.words();
        libc::syscall(
            number as libc::c_long,
            a as libc::c_long,
            b as libc::c_long,
            c as libc::c_long,
            d as libc::c_long,
            e as libc::c_long,
            f as libc::c_long,
        )
    };

    if result == -1 {
        debug!(errno = %Errno::last(), "call returned -1");
    } else {
        debug!(result, "call returned");
    }

    result as isize
}

fn preview_args(vector: &ArgVector) -> String {
    vector
        .args()
        .iter()
        .map(|&arg| format!("{:#x}", arg))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats a raw call result the way it is printed: a tab, `->`, the result as
/// an unpadded unsigned hex literal, a newline and a lone `.`.
pub fn render_result(result: isize) -> String {
    format!("\t->{:#x}\n.", result as usize)
}
