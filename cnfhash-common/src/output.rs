//! Unified routines to print data.

use atty::{self, Stream};
use chrono::{SecondsFormat, Utc};
use libc::{self, signal};
use std::{
    env,
    io::{self, Write},
    time::Instant,
};

/// Write one result line: the digest (empty on failure), two spaces, the name.
pub fn write_digest_line(output: &mut dyn Write, digest: Option<&str>, name: &str) -> io::Result<()> {
    writeln!(output, "{}  {}", digest.unwrap_or(""), name)
}

/// Write the first line of a run: program, version, UTC start time and working directory.
pub fn write_banner(output: &mut dyn Write, program: &str, version: &str) -> io::Result<()> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let directory = env::current_dir()?;
    writeln!(
        output,
        "{} {} {} {}",
        program,
        version,
        timestamp,
        directory.display()
    )
}

/// We handle SIGPIPE ourselves to avoid printing errors.
pub fn install_signal_handler() {
    // You can't disable assert! in Rust so this is fine.
    assert!(unsafe { signal(libc::SIGPIPE, libc::SIG_DFL) } != libc::SIG_ERR);
}

/// Check whether our diagnostics go to a terminal.
pub fn is_a_tty() -> bool {
    atty::is(Stream::Stderr)
}

/// A RAII object that logs the elapsed time when it is destroyed.
pub struct Timer {
    /// The name of the thing that is being timed
    name: String,
    /// The start time, set at construction time
    start: Instant,
}

impl Timer {
    /// Create a timer with a given name.
    pub fn name(name: impl Into<String>) -> Timer {
        Timer {
            name: name.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let elapsed_time = self.start.elapsed();
        tracing::debug!(
            target: "cnfhash::timing",
            "{} took {}.{:03}s",
            self.name,
            elapsed_time.as_secs(),
            elapsed_time.subsec_millis()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_lines() {
        let mut output = Vec::new();
        write_digest_line(&mut output, Some("cnf2$00"), "a.cnf").unwrap();
        write_digest_line(&mut output, None, "b.cnf").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "cnf2$00  a.cnf\n  b.cnf\n");
    }

    #[test]
    fn banner() {
        let mut output = Vec::new();
        write_banner(&mut output, "cnfhash", "1.2.3").unwrap();
        let banner = String::from_utf8(output).unwrap();
        let fields: Vec<&str> = banner.trim_end().splitn(4, ' ').collect();
        assert_eq!(fields[..2], ["cnfhash", "1.2.3"]);
        assert!(chrono::DateTime::parse_from_rfc3339(fields[2]).is_ok());
        assert!(fields[2].ends_with('Z'));
        assert_eq!(fields[3], env::current_dir().unwrap().display().to_string());
    }
}
