/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::ffi::CString;
use std::ffi::NulError;
use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::ffi::OsStringExt;

use hexword::HexError;
use thiserror::Error;
use tracing::debug;

/// Number of words passed to the kernel: the call number and six arguments.
pub const SLOTS: usize = 7;

/// Number of leading command-line tokens that are looked at. A `-A` and the
/// string following it both count, and the last slot is never filled.
pub const TOKENS: usize = SLOTS - 1;

/// Flag introducing a string whose address becomes the argument.
const STRING_FLAG: &[u8] = b"-A";

#[derive(Debug, Error)]
pub enum ArgError {
    #[error("Saw \"0x\" prefix, but got malformed hex: {token:?}")]
    MalformedHex {
        token: String,
        #[source]
        source: HexError,
    },

    #[error("Expected a decimal integer, got {0:?}")]
    MalformedDecimal(String),

    #[error("\"-A\" requires an argument.")]
    MissingString,

    #[error("String argument contains a NUL byte")]
    NulInString(#[from] NulError),
}

#[derive(Debug)]
enum Slot {
    Word(usize),
    /// A NUL-terminated buffer passed by address.
    Bytes(CString),
}

impl Default for Slot {
    fn default() -> Self {
        Slot::Word(0)
    }
}

impl Slot {
    fn word(&self) -> usize {
        match self {
            Slot::Word(word) => *word,
            // The heap buffer stays put for as long as the `CString` lives,
            // even when the vector holding it moves.
            Slot::Bytes(bytes) => bytes.as_ptr() as usize,
        }
    }
}

/// The call number followed by the call's arguments, one native word each.
///
/// Strings passed with `-A` are owned here; their addresses are only taken
/// when the words are read out, and stay valid until the vector is dropped.
#[derive(Debug, Default)]
pub struct ArgVector {
    slots: [Slot; SLOTS],
}

impl ArgVector {
    /// Classifies the first [`TOKENS`] of `tokens` into consecutive slots:
    ///
    ///  - `0x1f`: hexadecimal, see [`hexword::parse_word`].
    ///  - `-Afoo` or `-A foo`: the address of a NUL-terminated copy of `foo`.
    ///    The separate form only finds `foo` inside the window.
    ///  - anything else: a decimal integer. Negative values are stored in two's
    ///    complement.
    ///
    /// Slots left over are zero. Tokens past the window are ignored without
    /// being looked at.
    pub fn parse<I>(tokens: I) -> Result<Self, ArgError>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        let mut vector = Self::default();
        let mut tokens = tokens.into_iter().take(TOKENS).map(Into::<OsString>::into);
        let mut slot = 0;

        while let Some(token) = tokens.next() {
            let bytes = token.as_bytes();

            let value = if is_hex(bytes) {
                let text = token.to_string_lossy();
                let word = hexword::parse_word(&text).map_err(|source| ArgError::MalformedHex {
                    token: text.into_owned(),
                    source,
                })?;
                Slot::Word(word)
            } else if let Some(rest) = bytes.strip_prefix(STRING_FLAG) {
                let string = if rest.is_empty() {
                    tokens.next().ok_or(ArgError::MissingString)?.into_vec()
                } else {
                    rest.to_vec()
                };
                Slot::Bytes(CString::new(string)?)
            } else {
                let text = token.to_string_lossy();
                let word = parse_decimal(&text)
                    .ok_or_else(|| ArgError::MalformedDecimal(text.into_owned()))?;
                Slot::Word(word)
            };

            debug!(slot, "classified {:?} as {:?}", token, value);
            vector.slots[slot] = value;
            slot += 1;
        }

        Ok(vector)
    }

    /// All seven words, call number first. Slots holding a string yield the
    /// address of its first byte.
    pub fn words(&self) -> [usize; SLOTS] {
        self.slots.each_ref().map(Slot::word)
    }

    pub fn number(&self) -> usize {
        self.slots[0].word()
    }

    pub fn args(&self) -> [usize; SLOTS - 1] {
        let [_, args @ ..] = self.words();
        args
    }
}

fn is_hex(token: &[u8]) -> bool {
    matches!(token, [b'0', b'x' | b'X', ..])
}

fn parse_decimal(text: &str) -> Option<usize> {
    text.parse::<usize>()
        .ok()
        .or_else(|| text.parse::<isize>().ok().map(|v| v as usize))
}
