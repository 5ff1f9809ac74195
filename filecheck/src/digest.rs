//! Fast content digest over a bounded file prefix, for change detection.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use xxhash_rust::xxh3::Xxh3;

/// Bytes hashed from the start of each file (4 MiB).
pub const DIGEST_PREFIX_LEN: u64 = 4 * 1024 * 1024;

const CHUNK_SIZE: usize = 64 * 1024;

/// XXH3-64 of the first `DIGEST_PREFIX_LEN` bytes of `path`, as 16 hex digits.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be opened or read.
pub fn prefix_digest(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    digest_reader(file.take(DIGEST_PREFIX_LEN))
}

/// XXH3-64 of everything `reader` yields, as 16 hex digits.
///
/// # Errors
///
/// Returns the first non-`Interrupted` read error.
pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Xxh3::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..read]);
    }
    let value = hasher.digest();
    Ok(format!("{value:016x}"))
}
