use crate::classify::classify;
use crate::error::ReccatError;
use crate::fs::{EntryKind, FileSystem, OsFileSystem};
use crate::options::ReccatOptions;
use crate::output::Emitter;
use crate::types::{RunSummary, SkipReason};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::vec;

/// Creates the output file and merges every admissible text file under
/// `options.root` into it.
///
/// Only a failure to create or write the output aborts the run. Unreadable
/// directories, failed stats and unopenable files are logged and recorded
/// in the returned summary.
pub fn reccat(options: &ReccatOptions) -> Result<RunSummary, ReccatError> {
    let file = File::create(&options.output).map_err(|source| ReccatError::CreateOutput {
        path: options.output.clone(),
        source,
    })?;
    let summary = merge_into(&OsFileSystem, options, BufWriter::new(file))?;
    tracing::debug!(
        "wrote {} files ({} bytes) to {}",
        summary.files_merged,
        summary.bytes_written,
        options.output.display()
    );
    Ok(summary)
}

/// Walks `options.root` through `fs` and writes accepted files to `out`.
///
/// `options.output` is still consulted so the output file is never read back
/// as an input.
pub fn merge_into<F, W>(fs: &F, options: &ReccatOptions, out: W) -> Result<RunSummary, ReccatError>
where
    F: FileSystem + ?Sized,
    W: Write,
{
    let mut walker = Walker::new(fs, options, out)?;
    walker.run()?;
    walker.finish()
}

fn build_matcher(patterns: &[String]) -> Result<Option<GlobSet>, ReccatError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| ReccatError::Pattern(format!("'{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| ReccatError::Pattern(e.to_string()))
}

/// A directory whose entries are still being visited.
struct Frame {
    path: PathBuf,
    entries: vec::IntoIter<OsString>,
}

struct Walker<'a, F: ?Sized, W: Write> {
    fs: &'a F,
    options: &'a ReccatOptions,
    matcher: Option<GlobSet>,
    output: Option<PathBuf>,
    emitter: Emitter<W>,
    summary: RunSummary,
}

impl<'a, F, W> Walker<'a, F, W>
where
    F: FileSystem + ?Sized,
    W: Write,
{
    fn new(fs: &'a F, options: &'a ReccatOptions, out: W) -> Result<Self, ReccatError> {
        let matcher = build_matcher(&options.ignore_patterns)?;
        let output = fs.canonicalize(&options.output).ok();
        if output.is_none() {
            tracing::debug!(
                "output {} cannot be resolved; self-inclusion check disabled",
                options.output.display()
            );
        }
        Ok(Self {
            fs,
            options,
            matcher,
            output,
            emitter: Emitter::new(out),
            summary: RunSummary::new(options.record_entries),
        })
    }

    /// Depth-first, pre-order, in enumeration order. Each directory keeps a
    /// frame on the stack until its last entry has been handled.
    fn run(&mut self) -> Result<(), ReccatError> {
        let mut stack = Vec::new();
        if let Some(frame) = self.enter(self.options.root.clone()) {
            stack.push(frame);
        }
        while let Some(frame) = stack.last_mut() {
            let Some(name) = frame.entries.next() else {
                if let Some(done) = stack.pop() {
                    tracing::info!("exiting directory: {}", done.path.display());
                }
                continue;
            };
            let path = frame.path.join(&name);
            match self.fs.kind(&path) {
                Ok(EntryKind::Directory) => {
                    if let Some(child) = self.visit_dir(&name, path) {
                        stack.push(child);
                    }
                }
                Ok(EntryKind::File) => self.visit_file(&name, path)?,
                Ok(EntryKind::Other) => {
                    tracing::debug!("ignoring special file: {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("cannot stat {}: {}", path.display(), e);
                    self.summary.fail(path, SkipReason::StatFailed, &e);
                }
            }
        }
        Ok(())
    }

    fn enter(&mut self, path: PathBuf) -> Option<Frame> {
        match self.fs.read_dir(&path) {
            Ok(entries) => {
                tracing::info!("entering directory: {}", path.display());
                self.summary.dirs_visited += 1;
                Some(Frame {
                    path,
                    entries: entries.into_iter(),
                })
            }
            Err(e) => {
                tracing::warn!("cannot open directory {}: {}", path.display(), e);
                self.summary.fail(path, SkipReason::DirUnreadable, &e);
                None
            }
        }
    }

    fn visit_dir(&mut self, name: &OsString, path: PathBuf) -> Option<Frame> {
        if self.options.rules.skips_dir(name) {
            tracing::info!("skipping directory: {}", path.display());
            self.summary.skip(path, SkipReason::ExcludedDir);
            return None;
        }
        if self.ignored(&path) {
            tracing::info!("skipping ignored directory: {}", path.display());
            self.summary.skip(path, SkipReason::IgnorePattern);
            return None;
        }
        self.enter(path)
    }

    fn visit_file(&mut self, name: &OsString, path: PathBuf) -> Result<(), ReccatError> {
        if self.is_output(&path) {
            tracing::debug!("skipping output file: {}", path.display());
            self.summary.skip(path, SkipReason::SelfInclusion);
            return Ok(());
        }
        if self.options.rules.skips_file(name) {
            tracing::info!("skipping file: {}", path.display());
            self.summary.skip(path, SkipReason::ExcludedFile);
            return Ok(());
        }
        if self.ignored(&path) {
            tracing::info!("skipping ignored file: {}", path.display());
            self.summary.skip(path, SkipReason::IgnorePattern);
            return Ok(());
        }
        if classify(self.fs, &path, self.options.binary_detection).is_binary() {
            tracing::info!("skipped binary file: {}", path.display());
            self.summary.skip(path, SkipReason::Binary);
            return Ok(());
        }
        let source = match self.fs.open(&path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("cannot open file {}: {}", path.display(), e);
                self.summary.fail(path, SkipReason::OpenFailed, &e);
                return Ok(());
            }
        };
        tracing::info!("processing file: {}", path.display());
        let emitted = self.emitter.emit(&path, source)?;
        if let Some(e) = emitted.read_error {
            tracing::warn!(
                "read of {} stopped after {} bytes: {}",
                path.display(),
                emitted.bytes,
                e
            );
            self.summary.fail(path.clone(), SkipReason::Truncated, &e);
        }
        self.summary.merged(path);
        Ok(())
    }

    fn is_output(&self, path: &Path) -> bool {
        let Some(output) = &self.output else {
            return false;
        };
        self.fs
            .canonicalize(path)
            .is_ok_and(|candidate| &candidate == output)
    }

    fn ignored(&self, path: &Path) -> bool {
        let Some(matcher) = &self.matcher else {
            return false;
        };
        let relative = path.strip_prefix(&self.options.root).unwrap_or(path);
        matcher.is_match(relative)
    }

    fn finish(self) -> Result<RunSummary, ReccatError> {
        let mut summary = self.summary;
        summary.bytes_written = self.emitter.bytes_written();
        self.emitter.finish()?;
        Ok(summary)
    }
}
