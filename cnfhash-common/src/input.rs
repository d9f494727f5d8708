//! File reader
//!
//! Opens DIMACS files for the decoder, transparently uncompressing them
//! based on their file extension.

use crate::error::Result;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};

/// File extension of Zstandard archives.
const ZSTD: &str = ".zst";
/// File extension of Gzip archives.
const GZIP: &str = ".gz";
/// File extension of Bzip2 archives.
const BZIP2: &str = ".bz2";
/// File extension of XZ archives.
const XZ: &str = ".xz";
/// File extension of LZ4 archives.
const LZ4: &str = ".lz4";

/// The filename that stands for standard input.
pub const STDIN: &str = "-";

/// Strip the compression format off a filename.
///
/// If the filename ends with a known archive extension,
/// return the filname without extension and the extension.
/// Otherwise return the unmodified filename and the empty string.
pub fn compression_format_by_extension(filename: &str) -> (&str, &str) {
    for extension in &[ZSTD, GZIP, BZIP2, LZ4, XZ] {
        if filename.ends_with(extension) {
            return (&filename[0..filename.len() - extension.len()], extension);
        }
    }
    (filename, "")
}

/// Open a possibly compressed DIMACS file.
///
/// If the file is compressed it is transparently uncompressed.
/// If the filename is "-", reads data from stdin.
pub fn open_dimacs(filename: &str) -> Result<Box<dyn BufRead>> {
    if filename == STDIN {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(Path::new(filename))?;
    read_from_compressed_file(file, filename)
}

/// Wrap a file in the decoder matching its extension.
fn read_from_compressed_file(file: File, filename: &str) -> Result<Box<dyn BufRead>> {
    let (_basename, compression_format) = compression_format_by_extension(filename);
    let reader: Box<dyn Read> = match compression_format {
        ZSTD => Box::new(zstd::stream::read::Decoder::new(file)?),
        GZIP => Box::new(flate2::read::MultiGzDecoder::new(file)),
        BZIP2 => Box::new(bzip2::read::BzDecoder::new(file)),
        XZ => Box::new(xz2::read::XzDecoder::new(file)),
        LZ4 => Box::new(lz4::Decoder::new(file)?),
        _ => return Ok(Box::new(BufReader::new(file))),
    };
    tracing::trace!(filename, compression_format, "decompressing input");
    Ok(Box::new(BufReader::new(reader)))
}
