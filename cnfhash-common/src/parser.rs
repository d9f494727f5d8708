//! DIMACS parser
//!
//! Turns a DIMACS byte stream into the flat integer sequence that is hashed:
//! the two header values followed by all literals, where every clause is
//! terminated by a single zero.

use crate::{
    config::Config,
    error::{Error, Result},
    line::{LineClassifier, LineKind},
    token::{parse_decimal, Cursor, Tokens},
};
use std::{collections::VecDeque, io::BufRead};

/// The numbers declared by the `p cnf` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub clauses: i64,
    pub variables: i64,
}

/// Parse a header line of the form `p cnf <clauses> <variables>`.
pub fn parse_header(line: &[u8], line_number: usize) -> Result<Header> {
    let malformed = || Error::MalformedHeader { line: line_number };
    let mut cursor = Cursor::new(line);
    if !(cursor.expect(b"p") && cursor.skip_some_whitespace() && cursor.expect(b"cnf")) {
        return Err(malformed());
    }
    if !cursor.skip_some_whitespace() {
        return Err(malformed());
    }
    let clauses = cursor.digits();
    if clauses.is_empty() || !cursor.skip_some_whitespace() {
        return Err(malformed());
    }
    let variables = cursor.digits();
    cursor.skip_any_whitespace();
    if variables.is_empty() || !cursor.at_end() {
        return Err(malformed());
    }
    Ok(Header {
        clauses: parse_decimal(clauses, line_number)?,
        variables: parse_decimal(variables, line_number)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    AwaitingHeader,
    ReadingBody(Header),
}

/// Streaming DIMACS decoder.
///
/// This is an iterator over the canonical integer sequence. The first error
/// ends the iteration; nothing is produced after it.
pub struct Decoder<R> {
    input: R,
    classifier: LineClassifier,
    strict_header_check: bool,
    state: ParseState,
    /// Values decoded from the current line that were not yet consumed
    pending: VecDeque<i64>,
    /// Reused line buffer
    buffer: Vec<u8>,
    /// The number of the last line read (1-based)
    line_number: usize,
    /// Completed clauses so far
    clauses: i64,
    /// Whether the last value produced was a zero
    was_zero: bool,
    /// Whether the input is exhausted or an error was reported
    finished: bool,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(input: R, config: &Config) -> Decoder<R> {
        Decoder {
            input,
            classifier: LineClassifier::new(config),
            strict_header_check: config.strict_header_check,
            state: ParseState::AwaitingHeader,
            pending: VecDeque::new(),
            buffer: Vec::new(),
            line_number: 0,
            clauses: 0,
            was_zero: false,
            finished: false,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// The number of clauses terminated so far.
    pub fn clauses(&self) -> i64 {
        self.clauses
    }

    /// Read the next line into the buffer, without its line ending.
    ///
    /// Returns false at end of input.
    fn read_line(&mut self) -> Result<bool> {
        self.buffer.clear();
        if self.input.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(false);
        }
        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
        }
        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }
        self.line_number += 1;
        Ok(true)
    }

    /// Consume input until at least one value is pending or the input ends.
    fn advance(&mut self) -> Result<()> {
        while self.pending.is_empty() {
            if !self.read_line()? {
                return self.finish();
            }
            match self.classifier.classify(&self.buffer) {
                LineKind::Ignorable => continue,
                LineKind::Terminator => {
                    tracing::debug!(line = self.line_number, "reached terminating line");
                    return self.finish();
                }
                LineKind::Content => (),
            }
            match self.state {
                ParseState::AwaitingHeader => {
                    let header = parse_header(&self.buffer, self.line_number)?;
                    tracing::debug!(
                        clauses = header.clauses,
                        variables = header.variables,
                        "parsed header"
                    );
                    self.pending.push_back(header.clauses);
                    self.pending.push_back(header.variables);
                    self.state = ParseState::ReadingBody(header);
                }
                ParseState::ReadingBody(header) => self.parse_literals(header)?,
            }
        }
        Ok(())
    }

    /// Decode the literals of the current line.
    fn parse_literals(&mut self, header: Header) -> Result<()> {
        for token in Tokens::new(&self.buffer, self.line_number) {
            let literal = token?;
            if self.strict_header_check
                && literal != 0
                && !(-header.variables..=header.variables).contains(&literal)
            {
                return Err(Error::LiteralOutOfRange {
                    line: self.line_number,
                    literal,
                    variables: header.variables,
                });
            }
            if literal == 0 {
                // Consecutive zeros terminate only one clause.
                if self.was_zero {
                    continue;
                }
                self.clauses += 1;
            }
            self.was_zero = literal == 0;
            self.pending.push_back(literal);
        }
        Ok(())
    }

    /// Checks at the end of the input.
    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        let header = match self.state {
            ParseState::AwaitingHeader => return Err(Error::EmptyOrHeaderlessInput),
            ParseState::ReadingBody(header) => header,
        };
        tracing::debug!(
            lines = self.line_number,
            clauses = self.clauses,
            "finished decoding"
        );
        if self.strict_header_check {
            if self.clauses != header.clauses {
                return Err(Error::ClauseCountMismatch {
                    expected: header.clauses,
                    actual: self.clauses,
                });
            }
            // Also rejects formulas without any clause terminator.
            if !self.was_zero {
                return Err(Error::UnterminatedClause);
            }
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for Decoder<R> {
    type Item = Result<i64>;
    fn next(&mut self) -> Option<Result<i64>> {
        loop {
            if let Some(value) = self.pending.pop_front() {
                return Some(Ok(value));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.advance() {
                self.finished = true;
                self.pending.clear();
                return Some(Err(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_with(config: &Config, text: &str) -> Result<Vec<i64>> {
        Decoder::new(text.as_bytes(), config).collect()
    }

    fn decode(text: &str) -> Result<Vec<i64>> {
        decode_with(&Config::default(), text)
    }

    fn strict(text: &str) -> Result<Vec<i64>> {
        decode_with(&Config::default().header_check(true), text)
    }

    #[test]
    fn header() {
        assert_eq!(
            parse_header(b"p cnf 2 1", 1).unwrap(),
            Header {
                clauses: 2,
                variables: 1
            }
        );
        assert!(parse_header(b"p\tcnf   10\t20  \r", 1).is_ok());
        for malformed in &[
            "p cnf 1",
            "p cnf 1 2 3",
            " p cnf 1 2",
            "pcnf 1 2",
            "p cnf1 2",
            "p cnf -1 2",
            "p dnf 1 2",
            "p cnf 1 2 x",
        ] {
            match parse_header(malformed.as_bytes(), 4) {
                Err(Error::MalformedHeader { line: 4 }) => (),
                other => panic!("{:?} parsed as {:?}", malformed, other),
            }
        }
        assert!(matches!(
            parse_header(b"p cnf 123456789012345678901 1", 1),
            Err(Error::NumericOverflow { .. })
        ));
    }

    #[test]
    fn canonical_sequence() {
        assert_eq!(decode("p cnf 2 1\n1 -2 0\n").unwrap(), vec![2, 1, 1, -2, 0]);
        assert_eq!(
            decode("c comment\n\np cnf 2 1\n1   -2   0   0\n%\n").unwrap(),
            vec![2, 1, 1, -2, 0]
        );
        assert_eq!(decode("p cnf 1 1\n1\n").unwrap(), vec![1, 1, 1]);
        assert_eq!(
            decode("p cnf 2 2\n1 0 0\n0 2\n0\n").unwrap(),
            vec![2, 2, 1, 0, 2, 0]
        );
    }

    #[test]
    fn clauses_span_lines() {
        assert_eq!(
            decode("p cnf 3 2\n1 2\n-3 0 2\n3 0").unwrap(),
            vec![3, 2, 1, 2, -3, 0, 2, 3, 0]
        );
    }

    #[test]
    fn terminating_line_ends_input() {
        let config = Config::default().header_check(true);
        let mut decoder = Decoder::new(&b"p cnf 1 1\n1 0\n  %\n2 0\n"[..], &config);
        assert_eq!(
            decoder.by_ref().collect::<Result<Vec<i64>>>().unwrap(),
            vec![1, 1, 1, 0]
        );
        assert_eq!(decoder.clauses(), 1);
        assert_eq!(
            decoder.state(),
            ParseState::ReadingBody(Header {
                clauses: 1,
                variables: 1
            })
        );
        assert!(matches!(
            decode("c nothing\n %\np cnf 1 1\n"),
            Err(Error::EmptyOrHeaderlessInput)
        ));
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            decode("c x\r\np cnf 1 1\r\n-1 0\r\n").unwrap(),
            vec![1, 1, -1, 0]
        );
    }

    #[test]
    fn missing_header() {
        assert!(matches!(decode(""), Err(Error::EmptyOrHeaderlessInput)));
        assert!(matches!(
            decode("c only\n\n   \nc comments\n"),
            Err(Error::EmptyOrHeaderlessInput)
        ));
        assert!(matches!(
            decode("c x\n1 2 0\n"),
            Err(Error::MalformedHeader { line: 2 })
        ));
    }

    #[test]
    fn custom_ignore_patterns() {
        let config = Config {
            ignore_patterns: vec!["x".into()],
            strict_header_check: false,
        };
        assert_eq!(
            decode_with(&config, "x comment\np cnf 1 1\nx 5 0\n1 0\n").unwrap(),
            vec![1, 1, 1, 0]
        );
        assert!(matches!(
            decode_with(&config, "c comment\np cnf 1 1\n"),
            Err(Error::MalformedHeader { line: 1 })
        ));
    }

    #[test]
    fn strict_literal_range() {
        assert_eq!(strict("p cnf 1 2\n2 -2 0\n").unwrap(), vec![1, 2, 2, -2, 0]);
        match strict("p cnf 1 2\n1 -3 0\n") {
            Err(Error::LiteralOutOfRange {
                line: 2,
                literal: -3,
                variables: 2,
            }) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(decode("p cnf 1 2\n1 -3 0\n").is_ok());
    }

    #[test]
    fn strict_clause_count() {
        match strict("p cnf 2 1\n1 0\n") {
            Err(Error::ClauseCountMismatch {
                expected: 2,
                actual: 1,
            }) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(decode("p cnf 2 1\n1 0\n").is_ok());
        assert!(strict("p cnf 1 1\n1 0 0 0\n").is_ok());
    }

    #[test]
    fn strict_terminated_clause() {
        assert!(matches!(
            strict("p cnf 1 1\n1 0\n1\n"),
            Err(Error::UnterminatedClause)
        ));
        assert!(matches!(
            strict("p cnf 1 1\n1 0 -1"),
            Err(Error::UnterminatedClause)
        ));
        assert!(matches!(
            strict("p cnf 0 0\n"),
            Err(Error::UnterminatedClause)
        ));
        assert!(matches!(
            strict("p cnf 0 5\nc no clauses\n"),
            Err(Error::UnterminatedClause)
        ));
        assert_eq!(decode("p cnf 0 0\n").unwrap(), vec![0, 0]);
        assert_eq!(strict("p cnf 1 0\n0\n").unwrap(), vec![1, 0, 0]);
    }

    #[test]
    fn overflow() {
        assert!(matches!(
            decode("p cnf 1 1\n123456789012345678901 0\n"),
            Err(Error::NumericOverflow { line: 2, .. })
        ));
    }

    #[test]
    fn nothing_after_an_error() {
        let config = Config::default();
        let mut decoder = Decoder::new(&b"p cnf 1 1\n1 99999999999999999999 0\n"[..], &config);
        assert_eq!(decoder.next().unwrap().unwrap(), 1);
        assert_eq!(decoder.next().unwrap().unwrap(), 1);
        assert!(decoder.next().unwrap().is_err());
        assert!(decoder.next().is_none());
    }
}
