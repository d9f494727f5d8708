//! Line classification
//!
//! Decides for each input line whether the decoder has to look at it.

use crate::config::Config;

/// What a line means to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A comment or blank line.
    Ignorable,
    /// A line consisting of a single `%`, ending the formula.
    Terminator,
    /// Anything else: the header or a line of literals.
    Content,
}

/// Classifies lines according to a set of comment prefixes.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    /// Comment prefixes, each a whole word at the start of the line
    ignore_patterns: Vec<Vec<u8>>,
}

/// Returns true if the character is one of the whitespace characters we allow.
pub fn is_space(c: u8) -> bool {
    c.is_ascii_whitespace()
}

/// Remove leading and trailing whitespace.
pub fn trim(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|&c| !is_space(c)).unwrap_or(line.len());
    let end = line.iter().rposition(|&c| !is_space(c)).map_or(start, |i| i + 1);
    &line[start..end]
}

impl LineClassifier {
    /// Build a classifier for the configured comment prefixes.
    ///
    /// Empty prefixes are dropped; they would turn every indented line
    /// into a comment.
    pub fn new(config: &Config) -> LineClassifier {
        LineClassifier {
            ignore_patterns: config
                .ignore_patterns
                .iter()
                .filter(|pattern| {
                    if pattern.is_empty() {
                        tracing::warn!("ignoring empty comment prefix");
                    }
                    !pattern.is_empty()
                })
                .map(|pattern| pattern.as_bytes().to_vec())
                .collect(),
        }
    }

    /// Check if the line starts with a comment prefix followed by whitespace or the end of line.
    pub fn is_comment(&self, line: &[u8]) -> bool {
        self.ignore_patterns.iter().any(|pattern| {
            line.starts_with(pattern) && line.get(pattern.len()).map_or(true, |&c| is_space(c))
        })
    }

    /// Classify a single line (without its line terminator).
    pub fn classify(&self, line: &[u8]) -> LineKind {
        let trimmed = trim(line);
        if trimmed.is_empty() || self.is_comment(line) {
            LineKind::Ignorable
        } else if trimmed == b"%" {
            LineKind::Terminator
        } else {
            LineKind::Content
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(config: &Config, line: &str) -> LineKind {
        LineClassifier::new(config).classify(line.as_bytes())
    }

    #[test]
    fn comments() {
        let config = Config::default();
        assert_eq!(classify(&config, "c"), LineKind::Ignorable);
        assert_eq!(classify(&config, "c comment"), LineKind::Ignorable);
        assert_eq!(classify(&config, "c\tcomment"), LineKind::Ignorable);
        assert_eq!(classify(&config, "% no terminator"), LineKind::Ignorable);
        assert_eq!(classify(&config, "comment"), LineKind::Content);
        assert_eq!(classify(&config, " c comment"), LineKind::Content);
    }

    #[test]
    fn blank_lines() {
        let config = Config::default();
        assert_eq!(classify(&config, ""), LineKind::Ignorable);
        assert_eq!(classify(&config, "  \t \r"), LineKind::Ignorable);
    }

    #[test]
    fn terminator() {
        let config = Config {
            ignore_patterns: vec!["c".into()],
            strict_header_check: false,
        };
        assert_eq!(classify(&config, "%"), LineKind::Terminator);
        assert_eq!(classify(&config, "  %  "), LineKind::Terminator);
        assert_eq!(classify(&config, "%%"), LineKind::Content);
        assert_eq!(classify(&config, "% 0"), LineKind::Content);
        // With the default patterns, a bare "%" at the start of a line is a comment.
        assert_eq!(classify(&Config::default(), "%"), LineKind::Ignorable);
        assert_eq!(classify(&Config::default(), " %"), LineKind::Terminator);
    }

    #[test]
    fn patterns_are_literal() {
        let config = Config::default().ignore(".*").ignore("");
        assert_eq!(classify(&config, ".* x"), LineKind::Ignorable);
        assert_eq!(classify(&config, "ab x"), LineKind::Content);
        assert_eq!(classify(&config, " 1 2 0"), LineKind::Content);
    }

    #[test]
    fn trimming() {
        assert_eq!(trim(b"  1 0 \r"), b"1 0");
        assert_eq!(trim(b"   "), b"");
        assert_eq!(trim(b""), b"");
    }
}
