//! Integer tokens in DIMACS lines

use crate::{
    error::{Error, Result},
    line::is_space,
};
use static_assertions::const_assert;

/// Longest decimal representation we accept, including the sign.
///
/// Longer runs of digits cannot be a 64 bit value and are rejected before
/// being looked at.
pub const MAX_TOKEN_LENGTH: usize = 20;

const_assert!(MAX_TOKEN_LENGTH >= "-9223372036854775808".len());

/// Check if a character is a decimal digit.
pub fn is_digit(value: u8) -> bool {
    value.is_ascii_digit()
}

/// Parse a token of the form `-?[0-9]+`.
///
/// Fails if the token is longer than [MAX_TOKEN_LENGTH](constant.MAX_TOKEN_LENGTH.html)
/// or if its value does not lie within the range of `i64`.
pub fn parse_decimal(token: &[u8], line: usize) -> Result<i64> {
    let overflow = || Error::NumericOverflow {
        line,
        token: String::from_utf8_lossy(token).into_owned(),
    };
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(overflow());
    }
    let (negative, digits) = match token.split_first() {
        Some((b'-', digits)) => (true, digits),
        _ => (false, token),
    };
    requires!(!digits.is_empty() && digits.iter().all(|&c| is_digit(c)));
    let mut value: i64 = 0;
    for &c in digits {
        let digit = i64::from(c - b'0');
        // Accumulate towards the sign so that i64::MIN can be represented.
        value = value
            .checked_mul(10)
            .and_then(|value| {
                if negative {
                    value.checked_sub(digit)
                } else {
                    value.checked_add(digit)
                }
            })
            .ok_or_else(overflow)?;
    }
    Ok(value)
}

/// The signed integers in a line, from left to right.
///
/// A token is a maximal run of digits, optionally preceded by a minus sign.
/// Everything else separates tokens and is not validated.
pub struct Tokens<'a> {
    line: &'a [u8],
    position: usize,
    /// The line number for error messages
    line_number: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(line: &'a [u8], line_number: usize) -> Tokens<'a> {
        Tokens {
            line,
            position: 0,
            line_number,
        }
    }

    fn starts_token(&self, offset: usize) -> bool {
        match self.line[offset] {
            b'-' => self.line.get(offset + 1).map_or(false, |&c| is_digit(c)),
            c => is_digit(c),
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<i64>;
    fn next(&mut self) -> Option<Result<i64>> {
        while self.position < self.line.len() && !self.starts_token(self.position) {
            self.position += 1;
        }
        if self.position == self.line.len() {
            return None;
        }
        let start = self.position;
        self.position += 1;
        while self.position < self.line.len() && is_digit(self.line[self.position]) {
            self.position += 1;
        }
        Some(parse_decimal(&self.line[start..self.position], self.line_number))
    }
}

/// A cursor over the bytes of a single line.
pub struct Cursor<'a> {
    line: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(line: &'a [u8]) -> Cursor<'a> {
        Cursor { line, position: 0 }
    }
    /// Look at the next byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.line.get(self.position).cloned()
    }
    /// Consume the given bytes, returning false if they do not follow.
    pub fn expect(&mut self, expected: &[u8]) -> bool {
        if self.line[self.position..].starts_with(expected) {
            self.position += expected.len();
            true
        } else {
            false
        }
    }
    /// Parse zero or more whitespace characters.
    pub fn skip_any_whitespace(&mut self) {
        while self.peek().map_or(false, is_space) {
            self.position += 1;
        }
    }
    /// Parse one or more whitespace characters, returning false if there are none.
    pub fn skip_some_whitespace(&mut self) -> bool {
        let start = self.position;
        self.skip_any_whitespace();
        self.position != start
    }
    /// Consume a run of decimal digits, which may be empty.
    pub fn digits(&mut self) -> &'a [u8] {
        let start = self.position;
        while self.peek().map_or(false, is_digit) {
            self.position += 1;
        }
        &self.line[start..self.position]
    }
    pub fn at_end(&self) -> bool {
        self.position == self.line.len()
    }
}
