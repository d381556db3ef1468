//! # Reccat
//!
//! `reccat` walks a directory tree depth-first and concatenates the contents of every
//! text file into a single output, each preceded by a header naming its source path:
//!
//! ```text
//! \n===== FILE: src/main.rs =====\n<contents of src/main.rs>
//! ```
//!
//! Version-control, dependency and editor directories are skipped, as are lockfiles,
//! SVG files, binary files and the output file itself. Per-entry I/O failures are
//! logged through `tracing` and recorded in the [`RunSummary`]; only a failure to
//! create or write the output aborts the run.
//!
//! # Example
//!
//! ```no_run
//! use reccat::{reccat, BinaryDetection, ReccatBuilder};
//!
//! let options = ReccatBuilder::new("src", "merged.txt")
//!     .exclude_dir("target")
//!     .binary_detection(BinaryDetection::Heuristic)
//!     .build();
//!
//! let summary = reccat(&options).expect("cannot create merged.txt");
//! println!("{} files merged", summary.files_merged);
//! for skipped in &summary.skipped {
//!     println!("skipped {} ({:?})", skipped.path.display(), skipped.reason);
//! }
//! ```

pub mod classify;
mod engine;
mod error;
pub mod fs;
mod options;
pub mod output;
mod types;

pub use classify::Classification;
pub use engine::{merge_into, reccat};
pub use error::ReccatError;
pub use options::{BinaryDetection, ExclusionRules, ReccatBuilder, ReccatOptions};
pub use types::{RunSummary, SkipReason, SkippedEntry};
