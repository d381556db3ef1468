//! Text/binary decision from a file's leading bytes.

use crate::fs::FileSystem;
use crate::options::BinaryDetection;
use std::io::{self, Read};
use std::path::Path;

/// Bytes sampled from the head of each file.
pub const SAMPLE_LEN: usize = 512;

/// More non-printable bytes than this in the sample makes a file binary.
pub const NON_PRINTABLE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Text,
    Binary,
}

impl Classification {
    pub fn is_binary(self) -> bool {
        self == Classification::Binary
    }
}

/// Classifies an in-memory sample.
///
/// Only the first [`SAMPLE_LEN`] bytes are considered. With
/// [`BinaryDetection::Heuristic`] a null byte is immediately binary, and so is
/// a sample with more than [`NON_PRINTABLE_LIMIT`] bytes that are neither
/// printable ASCII nor whitespace. The count starts from zero on every call.
pub fn classify_sample(sample: &[u8], method: BinaryDetection) -> Classification {
    let sample = &sample[..sample.len().min(SAMPLE_LEN)];
    match method {
        BinaryDetection::Heuristic => heuristic(sample),
        BinaryDetection::Accurate if content_inspector::inspect(sample).is_binary() => {
            Classification::Binary
        }
        BinaryDetection::Accurate | BinaryDetection::None => Classification::Text,
    }
}

/// Classifies the file at `path`. A file that cannot be read is binary.
pub fn classify<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    method: BinaryDetection,
) -> Classification {
    if method == BinaryDetection::None {
        return Classification::Text;
    }
    match read_sample(fs, path) {
        Ok(sample) => classify_sample(&sample, method),
        Err(e) => {
            tracing::warn!("cannot read {} for classification: {}", path.display(), e);
            Classification::Binary
        }
    }
}

fn read_sample<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> io::Result<Vec<u8>> {
    let mut sample = Vec::with_capacity(SAMPLE_LEN);
    fs.open(path)?
        .take(SAMPLE_LEN as u64)
        .read_to_end(&mut sample)?;
    Ok(sample)
}

fn heuristic(sample: &[u8]) -> Classification {
    let mut non_printable = 0usize;
    for &byte in sample {
        if byte == 0 {
            return Classification::Binary;
        }
        if !is_printable(byte) && !is_space(byte) {
            non_printable += 1;
            if non_printable > NON_PRINTABLE_LIMIT {
                return Classification::Binary;
            }
        }
    }
    Classification::Text
}

// C-locale `isprint`.
fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

// C-locale `isspace`, which unlike `u8::is_ascii_whitespace` includes `\v`.
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}
