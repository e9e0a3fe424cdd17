//! Fingerprint engine.
//!
//! Accumulates raw bytes from files and literals into a SHA-256 state and
//! renders the result as the shared secret. Bytes are fed exactly as read, with
//! no separators, so any edit to a covered file (whitespace included) changes
//! the secret.
//!
//! This file, like the rest of the fingerprint module, is itself part of the
//! deployed artifact set.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::fingerprint::artifact::{expand_glob, is_glob, Artifact, ArtifactError};
use crate::fingerprint::Secret;

/// Single-use accumulator for one secret computation.
#[derive(Debug, Clone, Default)]
pub struct FingerprintEngine {
    hasher: Sha256,
    files: usize,
}

impl FingerprintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb a file, or every file a glob matches in sorted order.
    ///
    /// Returns the number of files read.
    pub fn absorb(&mut self, path_or_glob: &str) -> Result<usize, ArtifactError> {
        if !is_glob(path_or_glob) {
            self.absorb_file(Path::new(path_or_glob))?;
            return Ok(1);
        }

        let files = expand_glob(path_or_glob)?;
        for file in &files {
            self.absorb_file(file)?;
        }
        Ok(files.len())
    }

    /// Absorb the raw bytes of one file.
    pub fn absorb_file(&mut self, path: &Path) -> Result<(), ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::unreadable(path, e))?;
        let mut reader = BufReader::new(file);
        io::copy(&mut reader, &mut self.hasher).map_err(|e| ArtifactError::unreadable(path, e))?;
        self.files += 1;
        Ok(())
    }

    /// Absorb the UTF-8 bytes of a literal.
    pub fn absorb_text(&mut self, literal: &str) {
        self.hasher.update(literal.as_bytes());
    }

    pub fn absorb_artifact(&mut self, artifact: &Artifact) -> Result<(), ArtifactError> {
        match artifact {
            Artifact::Glob(pattern) => self.absorb(pattern).map(|_| ()),
            Artifact::File(path) => self.absorb_file(path),
            Artifact::Text(literal) => {
                self.absorb_text(literal);
                Ok(())
            }
        }
    }

    /// Number of files absorbed so far.
    pub fn files_absorbed(&self) -> usize {
        self.files
    }

    /// Digest of everything absorbed so far. Does not reset the state.
    pub fn digest(&self) -> Secret {
        Secret::from_digest(&self.hasher.clone().finalize())
    }

    /// Consume the engine and return its digest.
    pub fn finish(self) -> Secret {
        Secret::from_digest(&self.hasher.finalize())
    }
}
