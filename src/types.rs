use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

// Paths are rendered lossily so a non-UTF-8 name cannot fail serialization.
fn lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn lossy_paths<S: Serializer>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}

/// Why an entry did not make it into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Directory name is in the exclusion rules; its subtree was not visited.
    ExcludedDir,
    /// File name or extension is in the exclusion rules.
    ExcludedFile,
    /// Path matched a user-supplied ignore pattern.
    IgnorePattern,
    Binary,
    /// The candidate is the output file itself.
    SelfInclusion,
    OpenFailed,
    StatFailed,
    DirUnreadable,
    /// Emitted, but reading stopped early; the output holds a prefix of the file.
    Truncated,
}

impl SkipReason {
    /// Whether this reason comes from an I/O failure rather than a policy decision.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            SkipReason::OpenFailed
                | SkipReason::StatFailed
                | SkipReason::DirUnreadable
                | SkipReason::Truncated
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    #[serde(serialize_with = "lossy_path")]
    pub path: PathBuf,
    pub reason: SkipReason,
    /// The underlying system error text, for I/O failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// What a completed run did.
///
/// Counts are always kept. The per-entry lists are only filled when the run
/// records entries (see [`ReccatBuilder::record_entries`](crate::ReccatBuilder::record_entries)).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub files_merged: usize,
    pub entries_skipped: usize,
    /// Skips caused by I/O failures rather than policy.
    pub errors: usize,
    /// Total bytes written to the output, headers included.
    pub bytes_written: u64,
    pub dirs_visited: usize,
    /// Files whose header and contents were written, in output order.
    #[serde(serialize_with = "lossy_paths")]
    pub files_emitted: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
    #[serde(skip)]
    record: bool,
}

impl RunSummary {
    pub(crate) fn new(record: bool) -> Self {
        Self {
            record,
            ..Default::default()
        }
    }

    pub fn skipped_for(&self, reason: SkipReason) -> impl Iterator<Item = &SkippedEntry> {
        self.skipped.iter().filter(move |s| s.reason == reason)
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub(crate) fn merged(&mut self, path: PathBuf) {
        self.files_merged += 1;
        if self.record {
            self.files_emitted.push(path);
        }
    }

    pub(crate) fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        self.push(path, reason, None);
    }

    pub(crate) fn fail(&mut self, path: PathBuf, reason: SkipReason, err: &std::io::Error) {
        self.push(path, reason, Some(err.to_string()));
    }

    fn push(&mut self, path: PathBuf, reason: SkipReason, detail: Option<String>) {
        if reason.is_error() {
            self.errors += 1;
        }
        // A truncated file was still merged.
        if reason != SkipReason::Truncated {
            self.entries_skipped += 1;
        }
        if self.record {
            self.skipped.push(SkippedEntry {
                path,
                reason,
                detail,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn counts_without_recording_entries() {
        let mut summary = RunSummary::new(false);
        summary.merged(PathBuf::from("a.txt"));
        summary.skip(PathBuf::from("logo.svg"), SkipReason::ExcludedFile);
        summary.fail(
            PathBuf::from("secret"),
            SkipReason::OpenFailed,
            &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(summary.files_merged, 1);
        assert_eq!(summary.entries_skipped, 2);
        assert_eq!(summary.error_count(), 1);
        assert!(summary.files_emitted.is_empty());
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn truncated_file_counts_as_error_not_skip() {
        let mut summary = RunSummary::new(true);
        summary.merged(PathBuf::from("f"));
        summary.fail(
            PathBuf::from("f"),
            SkipReason::Truncated,
            &io::Error::other("gone"),
        );
        assert_eq!(summary.entries_skipped, 0);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.files_emitted, vec![PathBuf::from("f")]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_serialize_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = PathBuf::from(OsStr::from_bytes(b"src/caf\xe9.txt"));
        let mut summary = RunSummary::new(true);
        summary.merged(name.clone());
        summary.skip(name, SkipReason::Binary);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["files_emitted"][0], "src/caf\u{fffd}.txt");
        assert_eq!(json["skipped"][0]["path"], "src/caf\u{fffd}.txt");
        assert_eq!(json["skipped"][0]["reason"], "binary");
        assert!(json.get("record").is_none());
    }
}
