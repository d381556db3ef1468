//! Writing accepted files into the merged output.
//!
//! Every file is written as a header line followed by its raw bytes:
//!
//! ```text
//! \n===== FILE: <path> =====\n<contents>
//! ```
//!
//! Nothing is appended after the last file.

use crate::error::ReccatError;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

const HEADER_PREFIX: &[u8] = b"\n===== FILE: ";
const HEADER_SUFFIX: &[u8] = b" =====\n";
const COPY_BUF_SIZE: usize = 8 * 1024;

/// The exact header bytes written before the contents of `path`.
pub fn file_header(path: &Path) -> Vec<u8> {
    let name = path.as_os_str().as_encoded_bytes();
    let mut header = Vec::with_capacity(HEADER_PREFIX.len() + name.len() + HEADER_SUFFIX.len());
    header.extend_from_slice(HEADER_PREFIX);
    header.extend_from_slice(name);
    header.extend_from_slice(HEADER_SUFFIX);
    header
}

/// Result of copying one file.
#[derive(Debug)]
pub struct Emitted {
    /// Content bytes copied, header excluded.
    pub bytes: u64,
    /// Set when reading the source failed part way; the bytes before it were kept.
    pub read_error: Option<io::Error>,
}

/// Sole writer of the merged output.
pub struct Emitter<W: Write> {
    out: W,
    bytes_written: u64,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bytes_written: 0,
        }
    }

    /// Writes the header for `path` followed by everything `source` yields.
    ///
    /// Callers open the source first so a header is never written for a file
    /// that could not be opened. Only failures writing the output are errors.
    pub fn emit(&mut self, path: &Path, mut source: impl Read) -> Result<Emitted, ReccatError> {
        let header = file_header(path);
        self.out.write_all(&header).map_err(ReccatError::Output)?;
        self.bytes_written += header.len() as u64;

        let mut buf = [0u8; COPY_BUF_SIZE];
        let mut copied = 0u64;
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.bytes_written += copied;
                    return Ok(Emitted {
                        bytes: copied,
                        read_error: Some(e),
                    });
                }
            };
            self.out.write_all(&buf[..n]).map_err(ReccatError::Output)?;
            copied += n as u64;
        }
        self.bytes_written += copied;
        Ok(Emitted {
            bytes: copied,
            read_error: None,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes and hands back the sink.
    pub fn finish(mut self) -> Result<W, ReccatError> {
        self.out.flush().map_err(ReccatError::Output)?;
        Ok(self.out)
    }
}
