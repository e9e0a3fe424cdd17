//! Secret provider.
//!
//! Binds the fingerprint engine to this deployment's artifact set and
//! recomputes the secret on every call.

use std::path::Path;

use crate::config::ArtifactsConfig;
use crate::fingerprint::artifact::{Artifact, ArtifactError, ArtifactSet};
use crate::fingerprint::engine::FingerprintEngine;
use crate::fingerprint::Secret;

/// Application version shared with the backend.
pub const APP_VERSION: &str = "b19b0ccbe0069f8efd563e55c3ea69a4";

/// Source revision shared with the backend.
pub const VCS_ID: &str = "4e927e1a0a8608bfc58e9ea52d91f2cf";

/// Anything able to produce the current shared secret.
pub trait SecretSource: Send + Sync {
    fn get_secret(&self) -> Result<Secret, ArtifactError>;
}

/// Computes the secret from an [`ArtifactSet`], fresh on every call.
#[derive(Debug, Clone)]
pub struct SecretProvider {
    artifacts: ArtifactSet,
}

impl SecretProvider {
    pub fn new(artifacts: ArtifactSet) -> Self {
        Self { artifacts }
    }

    /// Provider for the deployed layout: descriptions, the fingerprint
    /// module's sources, then the two version constants.
    pub fn for_deployment(config: &ArtifactsConfig) -> Self {
        Self::new(deployment_artifacts(config, APP_VERSION, VCS_ID))
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }
}

impl SecretSource for SecretProvider {
    fn get_secret(&self) -> Result<Secret, ArtifactError> {
        let mut engine = FingerprintEngine::new();
        for artifact in self.artifacts.iter() {
            engine.absorb_artifact(artifact)?;
        }
        tracing::debug!(files = engine.files_absorbed(), "Shared secret computed");
        Ok(engine.finish())
    }
}

/// Build the fixed-order artifact set for a code directory.
pub fn deployment_artifacts(config: &ArtifactsConfig, app_version: &str, vcs_id: &str) -> ArtifactSet {
    let root = Path::new(&config.code_dir);
    let descriptions = root.join(&config.descriptions_glob);

    let mut set =
        ArtifactSet::default().with(Artifact::Glob(descriptions.to_string_lossy().into_owned()));
    for source in &config.engine_sources {
        set = set.with(Artifact::File(root.join(source)));
    }
    set.with(Artifact::Text(app_version.trim().to_string()))
        .with(Artifact::Text(vcs_id.trim().to_string()))
}
