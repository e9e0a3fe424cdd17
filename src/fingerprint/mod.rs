//! Shared-secret derivation.
//!
//! # Data Flow
//! ```text
//! ArtifactSet [descriptions glob, fingerprint sources, app version, vcs id]
//!     → provider.rs (fresh engine per call, fixed order)
//!     → engine.rs (absorb raw bytes into SHA-256)
//!     → Secret (lowercase hex)
//! ```
//!
//! # Design Decisions
//! - No caching: every secret reflects the code on disk right now
//! - Any unreadable artifact aborts the computation
//! - The secret is a tripwire for modified code, not a confidentiality mechanism

pub mod artifact;
pub mod engine;
pub mod provider;

use std::fmt;

pub use artifact::{Artifact, ArtifactError, ArtifactSet};
pub use engine::FingerprintEngine;
pub use provider::{SecretProvider, SecretSource, APP_VERSION, VCS_ID};

/// A finalized fingerprint, rendered as lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret(String);

impl Secret {
    pub(crate) fn from_digest(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Wrap an already-rendered secret, normalizing case and whitespace.
    pub fn from_hex(value: &str) -> Self {
        Self(value.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Full secret values stay out of debug logs.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.0.get(..8).unwrap_or(&self.0);
        write!(f, "Secret({}…)", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts() {
        let secret = Secret::from_digest(&[0xab; 32]);
        assert_eq!(secret.as_str().len(), 64);
        assert_eq!(format!("{:?}", secret), "Secret(abababab…)");
        assert_eq!(secret.to_string(), secret.as_str());
    }

    #[test]
    fn test_from_hex_normalizes() {
        assert_eq!(Secret::from_hex("  ABCDEF\n").as_str(), "abcdef");
    }
}
