//! Per-combination artifact layout and the JSON manifest that marks a
//! completed run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IoError;

/// File locations of one combination's artifacts inside an output
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    dir: PathBuf,
    name: String,
}

impl ArtifactPaths {
    /// Artifacts named after `name`, e.g. `downscaled_precip_MIROC6_ssp245`.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// `{name}.parquet`
    pub fn series(&self) -> PathBuf {
        self.dir.join(format!("{}.parquet", self.name))
    }

    /// `{name}_mapping.parquet`
    pub fn mapping(&self) -> PathBuf {
        self.dir.join(format!("{}_mapping.parquet", self.name))
    }

    /// `{name}_extremes.parquet`
    pub fn extremes(&self) -> PathBuf {
        self.dir.join(format!("{}_extremes.parquet", self.name))
    }

    /// `{name}.manifest.json`
    pub fn manifest(&self) -> PathBuf {
        self.dir.join(format!("{}.manifest.json", self.name))
    }

    /// The three data files, in write order.
    pub fn outputs(&self) -> [PathBuf; 3] {
        [self.series(), self.mapping(), self.extremes()]
    }
}

/// Record written after a combination's outputs are complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Fingerprint of configuration, combination, seed and input paths.
    pub fingerprint: String,
    /// Combination id.
    pub combination: String,
    /// Seed the combination ran with.
    pub seed: u64,
    /// RFC 3339 creation time.
    pub created: String,
    /// Output file names, relative to the manifest's directory.
    pub outputs: Vec<String>,
}

impl RunManifest {
    /// Manifest stamped with the current time, listing `paths`' outputs.
    pub fn new(
        fingerprint: impl Into<String>,
        combination: impl Into<String>,
        seed: u64,
        paths: &ArtifactPaths,
    ) -> Self {
        let outputs = paths
            .outputs()
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        Self {
            fingerprint: fingerprint.into(),
            combination: combination.into(),
            seed,
            created: chrono::Utc::now().to_rfc3339(),
            outputs,
        }
    }

    /// Whether this manifest was written for `fingerprint` and every output
    /// it lists exists next to it in `dir`.
    pub fn is_current(&self, fingerprint: &str, dir: &Path) -> bool {
        self.fingerprint == fingerprint
            && !self.outputs.is_empty()
            && self.outputs.iter().all(|o| dir.join(o).is_file())
    }
}

/// Writes `manifest` as pretty-printed JSON.
///
/// # Errors
///
/// [`IoError::Manifest`] if serialisation fails, [`IoError::File`] if the
/// file cannot be written.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), "manifest written");
    Ok(())
}

/// Reads a manifest, returning `None` if the file does not exist.
///
/// # Errors
///
/// [`IoError::File`] if the file exists but cannot be read,
/// [`IoError::Manifest`] if it is not a valid manifest.
pub fn read_manifest(path: &Path) -> Result<Option<RunManifest>, IoError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Some(serde_json::from_str(&text)?))
}
