//! Hash a DIMACS stream by running decoder and hasher concurrently
//!
//! The decoder runs on the calling thread and hands each value to a hasher
//! thread over a rendezvous channel, so it is never more than one value
//! ahead. If decoding fails, the hasher is told to give up before the
//! channel is closed, and its partial state is dropped.

use crate::{
    config::Config,
    error::Result,
    hasher::CnfHasher,
    input::open_dimacs,
    output::Timer,
    parser::Decoder,
};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::{io::BufRead, panic, thread};

/// Compute the hash value of a DIMACS formula.
pub fn hash_dimacs<R: BufRead>(input: R, config: &Config) -> Result<String> {
    let (value_sender, value_receiver) = bounded::<i64>(0);
    let (abort_sender, abort_receiver) = bounded::<()>(1);
    thread::scope(|scope| -> Result<String> {
        let hasher = scope.spawn(move || run_hasher(value_receiver, abort_receiver));
        let decoded = run_decoder(Decoder::new(input, config), &value_sender);
        if decoded.is_err() {
            // Must happen before the value channel is closed. The channel
            // is fresh with capacity one, so this only fails if the hasher
            // already panicked, which the join below reports.
            let _ = abort_sender.send(());
        }
        drop(value_sender);
        let digest = hasher
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload));
        decoded?;
        invariant!(digest.is_some());
        Ok(digest.unwrap_or_default())
    })
}

/// Open a possibly compressed file and compute its hash value.
pub fn hash_file(filename: &str, config: &Config) -> Result<String> {
    let _timer = Timer::name(format!("hashing {}", filename));
    let digest = hash_dimacs(open_dimacs(filename)?, config)?;
    tracing::debug!(filename, %digest, "hashed");
    Ok(digest)
}

/// Send every decoded value to the hasher, stopping at the first error.
fn run_decoder<R: BufRead>(decoder: Decoder<R>, values: &Sender<i64>) -> Result<()> {
    for value in decoder {
        if values.send(value?).is_err() {
            // The hasher is gone, which only happens if it panicked.
            break;
        }
    }
    Ok(())
}

/// Hash values until the channel is closed.
///
/// Returns `None` if the decoder failed.
fn run_hasher(values: Receiver<i64>, abort: Receiver<()>) -> Option<String> {
    let mut hasher = CnfHasher::new();
    hasher.extend(values.iter());
    match abort.try_recv() {
        Ok(()) => None,
        Err(_) => Some(hasher.finalize()),
    }
}
