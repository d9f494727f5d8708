//! Canonical hashing of decoded formulas

use sha1::{Digest, Sha1};
use std::fmt::{self, Write};

/// Identifies the canonicalization scheme and digest algorithm.
///
/// Any change to the bytes fed into the digest needs a new version, so that
/// stored hash values from different schemes are never confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashVersion {
    /// SHA-1 over `"<literal> "` for each literal and `"0\n"` for each clause,
    /// header excluded, repeated zeros collapsed, last clause always terminated.
    Cnf2,
}

impl HashVersion {
    pub fn tag(self) -> &'static str {
        match self {
            HashVersion::Cnf2 => "cnf2",
        }
    }
}

impl fmt::Display for HashVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Appended after each literal.
const LITERAL_DELIMITER: &[u8] = b" ";
/// Appended for each clause terminator.
const CLAUSE_DELIMITER: &[u8] = b"0\n";
/// The header values at the start of the sequence, which are not hashed.
const HEADER_LENGTH: usize = 2;

/// Consumes the decoded integer sequence and produces the hash value.
pub struct CnfHasher {
    digest: Sha1,
    /// Reused buffer for the decimal representation of literals
    text: String,
    /// Header values still to be skipped
    header_remaining: usize,
    /// Whether the last value was a zero
    was_zero: bool,
    /// Whether a literal was seen since the last zero
    in_clause: bool,
}

impl Default for CnfHasher {
    fn default() -> CnfHasher {
        CnfHasher::new()
    }
}

impl CnfHasher {
    pub const VERSION: HashVersion = HashVersion::Cnf2;

    pub fn new() -> CnfHasher {
        CnfHasher {
            digest: Sha1::new(),
            text: String::with_capacity(20),
            header_remaining: HEADER_LENGTH,
            was_zero: false,
            in_clause: false,
        }
    }

    /// Feed the next value of the sequence.
    pub fn update(&mut self, value: i64) {
        if self.header_remaining > 0 {
            self.header_remaining -= 1;
            return;
        }
        if value == 0 {
            if self.was_zero {
                return;
            }
            self.digest.update(CLAUSE_DELIMITER);
        } else {
            self.text.clear();
            let written = write!(self.text, "{}", value);
            invariant!(written.is_ok());
            self.digest.update(self.text.as_bytes());
            self.digest.update(LITERAL_DELIMITER);
        }
        self.was_zero = value == 0;
        self.in_clause = value != 0;
    }

    /// Finish the hash value as `<version>$<hex digest>`.
    pub fn finalize(mut self) -> String {
        if self.in_clause {
            self.digest.update(CLAUSE_DELIMITER);
        }
        format!("{}${}", Self::VERSION, hex::encode(self.digest.finalize()))
    }
}

impl Extend<i64> for CnfHasher {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, values: I) {
        for value in values {
            self.update(value);
        }
    }
}
