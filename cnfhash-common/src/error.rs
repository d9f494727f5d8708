//! Errors that abort a hashing run

use thiserror::Error;

/// Everything that can go wrong while decoding a DIMACS file.
///
/// Line numbers are 1-based and count every line of the input,
/// including comments and blank lines.
#[derive(Error, Debug)]
pub enum Error {
    #[error("expected \"p cnf <clauses> <variables>\" at line {line}")]
    MalformedHeader { line: usize },

    #[error("number {token} at line {line} does not fit into 64 bits")]
    NumericOverflow { line: usize, token: String },

    #[error("empty DIMACS file, expected at least a header")]
    EmptyOrHeaderlessInput,

    #[error("literal {literal} at line {line} exceeds the {variables} declared variables")]
    LiteralOutOfRange {
        line: usize,
        literal: i64,
        variables: i64,
    },

    #[error("expected {expected} clauses, got {actual} clauses")]
    ClauseCountMismatch { expected: i64, actual: i64 },

    #[error("CNFs must be terminated by a zero for the last clause")]
    UnterminatedClause,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
