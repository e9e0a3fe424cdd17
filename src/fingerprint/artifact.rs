//! Artifact descriptions and glob expansion.
//!
//! # Responsibilities
//! - Describe one fingerprint input (glob, file, or literal)
//! - Expand globs into a deterministic, sorted file list
//! - Report missing or unreadable artifacts as errors
//!
//! # Design Decisions
//! - Glob expansion walks only the literal directory prefix of the pattern
//! - `*` never crosses a path separator; `**` is needed for recursion
//! - Hidden files are skipped unless the pattern names them explicitly
//! - Symlinks are resolved; a dangling link or a matched directory is an error
//! - A glob matching nothing is an error, never an empty contribution

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use globset::GlobBuilder;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while collecting fingerprint inputs.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// A required file or glob base directory is missing or unreadable.
    #[error("artifact `{}` is unreadable: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A glob matched no files.
    #[error("artifact glob `{pattern}` matched no files")]
    NoMatches { pattern: String },

    /// A glob could not be compiled.
    #[error("artifact glob `{pattern}` is invalid: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl ArtifactError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }
}

/// A single input to the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Every file matching a glob, in sorted order.
    Glob(String),
    /// One file.
    File(PathBuf),
    /// A literal string, independent of the file system.
    Text(String),
}

/// An ordered collection of fingerprint inputs.
///
/// The digest depends on order, so the set is absorbed front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }

    /// Append an artifact, returning the extended set.
    pub fn with(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }
}

/// Returns true if `pattern` contains glob metacharacters.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Expand `pattern` to the sorted list of regular files it matches.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, ArtifactError> {
    let (base, rest) = split_literal_prefix(pattern);

    let matcher = GlobBuilder::new(&rest)
        .literal_separator(true)
        .build()
        .map_err(|source| ArtifactError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let include_hidden = rest.starts_with('.') || rest.contains("/.");
    let mut walker = WalkDir::new(&base)
        .min_depth(1)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));
    if !rest.contains("**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    let mut matches = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(base.as_path()).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop"));
            ArtifactError::unreadable(path, source)
        })?;

        let Ok(rel) = entry.path().strip_prefix(&base) else {
            continue;
        };
        let rel = slash_joined(rel);
        if !include_hidden && rel.split('/').any(|c| c.starts_with('.')) {
            continue;
        }
        if !matcher.is_match(&rel) {
            continue;
        }

        // Matched entries are resolved through symlinks and must be files.
        let metadata =
            fs::metadata(entry.path()).map_err(|e| ArtifactError::unreadable(entry.path(), e))?;
        if !metadata.is_file() {
            return Err(ArtifactError::unreadable(
                entry.path(),
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        matches.push(entry.into_path());
    }

    if matches.is_empty() {
        return Err(ArtifactError::NoMatches {
            pattern: pattern.to_string(),
        });
    }

    matches.sort();
    Ok(matches)
}

/// Split a pattern into the directory to walk and the pattern below it.
fn split_literal_prefix(pattern: &str) -> (PathBuf, String) {
    let mut base = PathBuf::new();
    let mut rest = Vec::new();

    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if !rest.is_empty() || (matches!(component, Component::Normal(_)) && is_glob(&text)) {
            rest.push(text.into_owned());
        } else {
            base.push(component);
        }
    }

    if base.as_os_str().is_empty() {
        base.push(".");
    }
    (base, rest.join("/"))
}

fn slash_joined(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
