//! Filesystem access used by the walk.
//!
//! The walk only needs to list a directory, stat a path, resolve a path and
//! open a file. Keeping those behind [`FileSystem`] lets the traversal run
//! against an in-memory tree in tests.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// What a path refers to after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Sockets, FIFOs, devices.
    Other,
}

pub trait FileSystem {
    /// Entry names of `path` in enumeration order, without `.` and `..`.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;
    fn kind(&self, path: &Path) -> io::Result<EntryKind>;
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        // Collected up front so the handle is closed before children are visited.
        let entries = fs::read_dir(path)?.map(|entry| entry.map(|e| e.file_name()));
        Ok(readable_entries(path, entries))
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        let file_type = fs::metadata(path)?.file_type();
        Ok(if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }
}

/// Keeps the names that could be read; a failed entry is reported and dropped
/// so its siblings are still visited.
fn readable_entries(
    dir: &Path,
    entries: impl Iterator<Item = io::Result<OsString>>,
) -> Vec<OsString> {
    entries
        .filter_map(|entry| match entry {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!("cannot read an entry of {}: {}", dir.display(), e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod memory {
    //! A tree held in memory, listed in insertion order.

    use super::{EntryKind, FileSystem};
    use std::ffi::OsString;
    use std::io::{self, Cursor, Read};
    use std::path::{Path, PathBuf};

    enum Node {
        Dir,
        File(Vec<u8>),
        /// Listed by its parent, but stat fails.
        Broken,
        /// A file that stats fine but cannot be opened.
        Locked,
        /// A directory that stats fine but cannot be listed.
        LockedDir,
    }

    #[derive(Default)]
    pub(crate) struct MemoryFs {
        nodes: Vec<(PathBuf, Node)>,
    }

    impl MemoryFs {
        pub(crate) fn new(root: &str) -> Self {
            let mut fs = Self::default();
            fs.nodes.push((PathBuf::from(root), Node::Dir));
            fs
        }
        pub(crate) fn dir(mut self, path: &str) -> Self {
            self.nodes.push((PathBuf::from(path), Node::Dir));
            self
        }
        pub(crate) fn file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
            self.nodes
                .push((PathBuf::from(path), Node::File(content.into())));
            self
        }
        pub(crate) fn broken(mut self, path: &str) -> Self {
            self.nodes.push((PathBuf::from(path), Node::Broken));
            self
        }
        pub(crate) fn locked(mut self, path: &str) -> Self {
            self.nodes.push((PathBuf::from(path), Node::Locked));
            self
        }
        pub(crate) fn locked_dir(mut self, path: &str) -> Self {
            self.nodes.push((PathBuf::from(path), Node::LockedDir));
            self
        }

        fn node(&self, path: &Path) -> io::Result<&Node> {
            self.nodes
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, n)| n)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn denied() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "permission denied")
    }

    impl FileSystem for MemoryFs {
        fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
            match self.node(path)? {
                Node::Dir => Ok(self
                    .nodes
                    .iter()
                    .filter(|(p, _)| p.parent() == Some(path))
                    .filter_map(|(p, _)| p.file_name().map(|n| n.to_os_string()))
                    .collect()),
                Node::LockedDir => Err(denied()),
                _ => Err(io::Error::new(io::ErrorKind::NotADirectory, "not a directory")),
            }
        }

        fn kind(&self, path: &Path) -> io::Result<EntryKind> {
            match self.node(path)? {
                Node::Dir | Node::LockedDir => Ok(EntryKind::Directory),
                Node::File(_) | Node::Locked => Ok(EntryKind::File),
                Node::Broken => Err(io::Error::new(io::ErrorKind::NotFound, "dangling link")),
            }
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            self.node(path)?;
            Ok(path.to_path_buf())
        }

        fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
            match self.node(path)? {
                Node::File(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
                Node::Locked => Err(denied()),
                _ => Err(io::Error::new(io::ErrorKind::IsADirectory, "is a directory")),
            }
        }
    }
}
