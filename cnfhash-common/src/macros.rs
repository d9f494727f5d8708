//! Macros and other utility code.

/// This should be used for every write to stderr.
#[macro_export]
macro_rules! write_to_stderr {
    ($($arg:tt)*) => ({
        use std::io::Write;
        // Nothing sensible is left to do if stderr is gone.
        let _ = write!(std::io::stderr(), $($arg)*);
    })
}

/// Print an error to stderr with red font color, without exiting.
#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => ({
        use $crate::ansi_term;
        let style = if $crate::output::is_a_tty() {
            ansi_term::Colour::Red.normal()
        } else {
            ansi_term::Style::default()
        };
        $crate::write_to_stderr!("{}", style.paint("Error: "));
        $crate::write_to_stderr!("{}\n", style.paint(&format!($($arg)*)));
    })
}

/// Report a fatal error and exit.
#[macro_export]
macro_rules! die {
    ($($arg:tt)*) => ({
        $crate::print_error!($($arg)*);
        std::process::exit(2);
    })
}

/// Native assertions cannot be disabled, that's why we prefer to use this
/// macro.
#[macro_export]
macro_rules! invariant {
    ($($arg:tt)*) => ({
        if $crate::config::CHECK_INVARIANTS {
            assert!($($arg)*);
        }
    })
}

/// Like invariant, but for preconditions.
#[macro_export]
macro_rules! requires {
    ($($arg:tt)*) => ({
        if $crate::config::CHECK_PRECONDITIONS {
            assert!($($arg)*);
        }
    })
}
