use crate::error::ReccatError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// How a file's leading bytes are judged to be text or binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    /// Null byte, or more than ten non-printable bytes, in the first 512 bytes.
    #[default]
    Heuristic,
    /// Encoding-aware inspection by `content_inspector`.
    Accurate,
    /// Every file is text.
    None,
}

/// Names that cause a directory or file to be skipped without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionRules {
    /// Directory names whose whole subtree is skipped.
    pub dirs: Vec<String>,
    /// Exact file names to skip.
    pub files: Vec<String>,
    /// File extensions to skip, compared against the text after the last `.`.
    pub extensions: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            dirs: vec![
                ".git".into(),
                "node_modules".into(),
                ".idea".into(),
                ".vscode".into(),
            ],
            files: vec!["package-lock.json".into(), "yarn.lock".into()],
            extensions: vec!["svg".into()],
        }
    }
}

impl ExclusionRules {
    /// Rules that exclude nothing.
    pub fn none() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Loads rules from a JSON document. Missing keys fall back to the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReccatError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ReccatError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|source| ReccatError::Rules {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn skips_dir(&self, name: &OsStr) -> bool {
        self.dirs.iter().any(|d| name == OsStr::new(d))
    }

    pub fn skips_file(&self, name: &OsStr) -> bool {
        if self.files.iter().any(|f| name == OsStr::new(f)) {
            return true;
        }
        let bytes = name.as_encoded_bytes();
        let Some(dot) = bytes.iter().rposition(|&b| b == b'.') else {
            return false;
        };
        let ext = &bytes[dot + 1..];
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').as_bytes() == ext)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReccatOptions {
    pub root: PathBuf,
    pub output: PathBuf,
    pub rules: ExclusionRules,
    pub ignore_patterns: Vec<String>,
    pub binary_detection: BinaryDetection,
    /// Keep every merged and skipped path in the summary, not just counts.
    pub record_entries: bool,
}

impl Default for ReccatOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: PathBuf::from("merged.txt"),
            rules: ExclusionRules::default(),
            ignore_patterns: Vec::new(),
            binary_detection: BinaryDetection::Heuristic,
            record_entries: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReccatBuilder {
    options: ReccatOptions,
}

impl ReccatBuilder {
    pub fn new(root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            options: ReccatOptions {
                root: root.into(),
                output: output.into(),
                ..Default::default()
            },
        }
    }
    pub fn rules(mut self, rules: ExclusionRules) -> Self {
        self.options.rules = rules;
        self
    }
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.options.rules.dirs.push(name.into());
        self
    }
    pub fn exclude_file(mut self, name: impl Into<String>) -> Self {
        self.options.rules.files.push(name.into());
        self
    }
    pub fn exclude_extension(mut self, ext: impl Into<String>) -> Self {
        self.options.rules.extensions.push(ext.into());
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn record_entries(mut self, yes: bool) -> Self {
        self.options.record_entries = yes;
        self
    }
    pub fn build(self) -> ReccatOptions {
        self.options
    }
}
