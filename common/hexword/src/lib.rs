/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Parsing and printing of `0x`-prefixed hexadecimal literals that fit in a
//! native machine word.

use std::fmt;
use std::mem;
use std::ops;
use std::str::FromStr;

use thiserror::Error;

/// Maximum number of hex digits that fit in a `usize`.
pub const WORD_DIGITS: usize = 2 * mem::size_of::<usize>();

/// Why a hexadecimal literal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("{0:?} is not a hexadecimal digit")]
    InvalidDigit(char),

    #[error("expected a \"0x\" or \"0X\" prefix")]
    MissingPrefix,

    #[error("no digits follow the \"0x\" prefix")]
    Empty,

    #[error("{digits} digits do not fit in a {}-bit word", usize::BITS)]
    TooLong { digits: usize },
}

/// Decodes a single hexadecimal digit. Both cases are accepted.
pub fn decode_char(c: char) -> Result<u8, HexError> {
    match c.to_ascii_lowercase() {
        d @ '0'..='9' => Ok(d as u8 - b'0'),
        d @ 'a'..='f' => Ok(d as u8 - b'a' + 10),
        _ => Err(HexError::InvalidDigit(c)),
    }
}

/// Parses a string of the form `0x1f` (or `0X1F`) into a native word.
///
/// Between one and [`WORD_DIGITS`] digits must follow the prefix. Nothing is
/// returned unless every digit decodes.
pub fn parse_word(s: &str) -> Result<usize, HexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(HexError::MissingPrefix)?;

    if digits.is_empty() {
        return Err(HexError::Empty);
    }

    if digits.len() > WORD_DIGITS {
        return Err(HexError::TooLong {
            digits: digits.len(),
        });
    }

    // Least significant digit first.
    digits
        .chars()
        .rev()
        .enumerate()
        .try_fold(0usize, |word, (i, c)| {
            let nibble = decode_char(c)?;
            Ok(word | ((nibble as usize) << (4 * i)))
        })
}

/// A native word that displays as a zero-padded hex literal, e.g.
/// `0x000000000000002a` on a 64-bit host.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
pub struct Word(pub usize);

impl fmt::LowerHex for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:0width$x}", self.0, width = WORD_DIGITS)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("0x")?;
        <Self as fmt::LowerHex>::fmt(self, f)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl ops::Deref for Word {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Word {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_word(s).map(Word)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_every_hex_digit() {
        for (i, c) in "0123456789abcdef".chars().enumerate() {
            assert_eq!(decode_char(c), Ok(i as u8));
            assert_eq!(decode_char(c.to_ascii_uppercase()), Ok(i as u8));
        }
    }

    #[test]
    fn rejects_non_hex_characters() {
        for c in ['g', 'G', 'x', ' ', '-', '/', ':', '@', '`', 'é', '\0'] {
            assert_eq!(decode_char(c), Err(HexError::InvalidDigit(c)));
        }
    }

    #[test]
    fn parses_words() {
        assert_eq!(parse_word("0x0"), Ok(0));
        assert_eq!(parse_word("0x1f"), Ok(0x1f));
        assert_eq!(parse_word("0X1F"), Ok(0x1f));
        assert_eq!(parse_word("0xDeadBeef"), Ok(0xdead_beef));
        assert_eq!(parse_word(&format!("0x{}", "0".repeat(WORD_DIGITS))), Ok(0));
    }

    #[test]
    fn parses_widest_word() {
        let max = format!("0x{}", "f".repeat(WORD_DIGITS));
        assert_eq!(parse_word(&max), Ok(usize::MAX));

        let top_bit = format!("0x8{}", "0".repeat(WORD_DIGITS - 1));
        assert_eq!(parse_word(&top_bit), Ok(1 << (usize::BITS - 1)));
    }

    #[test]
    fn rejects_malformed_literals() {
        assert_eq!(parse_word(""), Err(HexError::MissingPrefix));
        assert_eq!(parse_word("0"), Err(HexError::MissingPrefix));
        assert_eq!(parse_word("1f"), Err(HexError::MissingPrefix));
        assert_eq!(parse_word("x1f"), Err(HexError::MissingPrefix));
        assert_eq!(parse_word("00x1f"), Err(HexError::MissingPrefix));
        assert_eq!(parse_word("0x"), Err(HexError::Empty));
        assert_eq!(parse_word("0xZZ"), Err(HexError::InvalidDigit('Z')));
        assert_eq!(parse_word("0x12g4"), Err(HexError::InvalidDigit('g')));
        assert_eq!(parse_word("0x-1"), Err(HexError::InvalidDigit('-')));
        assert_eq!(parse_word("0x 1"), Err(HexError::InvalidDigit(' ')));
    }

    #[test]
    fn rejects_words_that_overflow() {
        let digits = WORD_DIGITS + 1;
        let s = format!("0x{}", "1".repeat(digits));
        assert_eq!(parse_word(&s), Err(HexError::TooLong { digits }));
    }

    #[test]
    fn word_display_is_zero_padded() {
        let expected = format!("0x{}2a", "0".repeat(WORD_DIGITS - 2));
        assert_eq!(Word(42).to_string(), expected);
        assert_eq!(format!("{:?}", Word(42)), expected);
        assert_eq!(format!("{:x}", Word(0)), "0".repeat(WORD_DIGITS));
        assert_eq!(
            Word(usize::MAX).to_string(),
            format!("0x{}", "f".repeat(WORD_DIGITS))
        );
    }

    #[test]
    fn word_from_str() {
        assert_eq!("0x2a".parse::<Word>(), Ok(Word(42)));
        assert_eq!(*"0X10".parse::<Word>().unwrap(), 16);
        assert_eq!("42".parse::<Word>(), Err(HexError::MissingPrefix));
    }

    #[test]
    fn errors_display() {
        assert_eq!(
            HexError::InvalidDigit('Z').to_string(),
            "'Z' is not a hexadecimal digit"
        );
        assert_eq!(
            HexError::TooLong { digits: 17 }.to_string(),
            format!("17 digits do not fit in a {}-bit word", usize::BITS)
        );
    }
}
