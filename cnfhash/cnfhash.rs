//! Compute formatting-insensitive hash values of DIMACS CNF formulas

use clap::{App, Arg, ArgMatches};
use cnfhash_common::{
    config::Config,
    die,
    error::Result,
    output::{install_signal_handler, write_banner, write_digest_line},
    pipeline::hash_file,
    print_error,
};
use crossbeam_channel::unbounded;
use std::{
    collections::BTreeMap,
    io::{self, Write},
    num::NonZeroUsize,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};
use tracing_subscriber::EnvFilter;

/// Run `cnfhash`.
fn main() {
    std::process::exit(run_frontend());
}

/// Run `cnfhash`, returning its exit code.
///
/// This is a separate function because `std::process::exit` does not
/// call destructors.
fn run_frontend() -> i32 {
    install_signal_handler();
    let flags = Flags::new(app().get_matches());
    install_logging(flags.verbosity);
    let stdout = io::stdout();
    let mut output = stdout.lock();
    run(&flags, &mut output).unwrap_or_else(|err| die!("failed to write output: {}", err))
}

fn app() -> App<'static, 'static> {
    App::new("cnfhash")
    .version(env!("CARGO_PKG_VERSION"))
    .about(env!("CARGO_PKG_DESCRIPTION"))
    .after_help(
        "Input files may be compressed - supported file extensions are: zst, gz, bz2, xz and lz4.
Use \"-\" to read from standard input.
After a banner line, prints for each file the hash value (empty on error) followed by two spaces and the filename."
        )
    .arg(Arg::with_name("INPUT").required(true).multiple(true).help("input files in DIMACS format"))
    .arg(Arg::with_name("FULLPATH").short("f").long("fullpath")
         .help("Print the full path of each file instead of its basename."))
    .arg(Arg::with_name("IGNORE").takes_value(true).multiple(true).number_of_values(1)
         .long("ignore").value_name("PREFIX")
         .help("Also ignore lines beginning with this word (besides \"c\" and \"%\")."))
    .arg(Arg::with_name("HEADER_CHECK").long("header-check")
         .help("Fail if literals or the number of clauses disagree with the header."))
    .arg(Arg::with_name("CONFIG").takes_value(true).long("config").value_name("FILE")
         .help("Read settings from a TOML file (keys: ignore, header-check)."))
    .arg(Arg::with_name("JOBS").takes_value(true).short("j").long("jobs").value_name("N")
         .help("Number of files hashed in parallel (default: number of CPUs)."))
    .arg(Arg::with_name("v").short("v").multiple(true)
         .help("Verbose output on stderr. Repeat for more detail."))
}

/// Hash all input files and write one line per file, in argument order.
///
/// Returns the exit code: 0 if every file was hashed, 2 otherwise.
fn run(flags: &Flags, output: &mut dyn Write) -> io::Result<i32> {
    write_banner(output, "cnfhash", env!("CARGO_PKG_VERSION"))?;
    let filenames = &flags.filenames;
    let config = &flags.config;
    let next = AtomicUsize::new(0);
    let (result_sender, result_receiver) = unbounded::<(usize, Result<String>)>();
    let mut success = true;
    thread::scope(|scope| -> io::Result<()> {
        for _ in 0..flags.jobs.min(filenames.len()) {
            let next = &next;
            let result_sender = result_sender.clone();
            scope.spawn(move || loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                if index >= filenames.len() {
                    break;
                }
                let result = hash_file(&filenames[index], config);
                if result_sender.send((index, result)).is_err() {
                    break;
                }
            });
        }
        drop(result_sender);
        // Results arrive in any order; hold them back until all earlier files are printed.
        let mut finished = BTreeMap::new();
        let mut printed = 0;
        for (index, result) in result_receiver {
            finished.insert(index, result);
            while let Some(result) = finished.remove(&printed) {
                let filename = &filenames[printed];
                let digest = match result {
                    Ok(digest) => Some(digest),
                    Err(err) => {
                        print_error!("failed to hash {}: {}", filename, err);
                        success = false;
                        None
                    }
                };
                write_digest_line(output, digest.as_deref(), &flags.display_name(filename))?;
                printed += 1;
            }
        }
        Ok(())
    })?;
    output.flush()?;
    Ok(if success { 0 } else { 2 })
}

/// Parsed arguments. See `cnfhash --help`.
#[derive(Debug)]
pub struct Flags {
    /// Print paths as given instead of basenames
    pub fullpath: bool,
    pub verbosity: u64,
    /// Number of worker threads
    pub jobs: usize,
    pub config: Config,
    /// Input formulas
    pub filenames: Vec<String>,
}

impl Flags {
    /// Create a flags instance from commandline arguments.
    pub fn new(matches: ArgMatches) -> Flags {
        let mut config = match matches.value_of("CONFIG") {
            Some(filename) => Config::from_toml_file(filename)
                .unwrap_or_else(|err| die!("failed to read {}: {}", filename, err)),
            None => Config::default(),
        };
        if let Some(patterns) = matches.values_of("IGNORE") {
            for pattern in patterns {
                config = config.ignore(pattern);
            }
        }
        if matches.is_present("HEADER_CHECK") {
            config = config.header_check(true);
        }
        let jobs = match matches.value_of("JOBS") {
            Some(jobs) => jobs
                .parse::<NonZeroUsize>()
                .map(NonZeroUsize::get)
                .unwrap_or_else(|err| die!("number of jobs must be a positive integer: {}", err)),
            None => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        };
        Flags {
            fullpath: matches.is_present("FULLPATH"),
            verbosity: matches.occurrences_of("v"),
            jobs,
            config,
            filenames: matches
                .values_of("INPUT")
                .map_or_else(Vec::new, |values| values.map(String::from).collect()),
        }
    }

    /// The name to print next to the hash value of a file.
    pub fn display_name(&self, filename: &str) -> String {
        if self.fullpath {
            return filename.to_string();
        }
        Path::new(filename)
            .file_name()
            .map_or_else(|| filename.to_string(), |name| name.to_string_lossy().into_owned())
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn install_logging(verbosity: u64) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
