//! Manifest Types
//!
//! Rust structs matching the `manifest.json` document read by the modpack
//! updater: `{"modpack": {"mods": [...]}}`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ManifestError, Result};
use crate::scan::{scan_dir, ScanOptions};

/// Default manifest file name at the repository root
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

const MAX_MANIFEST_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub modpack: Modpack,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modpack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub mods: Vec<ModEntry>,
}

/// One file in the mod directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModEntry {
    pub name: String,
    /// Repository-relative download path, always `/`-separated
    pub file: String,
    pub sha256: String,
    pub size: u64,
    /// External download location. Only present in hand-edited manifests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Manifest {
    pub fn new(name: Option<String>, mods: Vec<ModEntry>) -> Self {
        Self {
            modpack: Modpack { name, mods },
        }
    }

    /// Scan `dir` and build a fresh manifest from its contents
    pub fn generate(dir: &Path, options: &ScanOptions, name: Option<String>) -> Result<Self> {
        let mods = scan_dir(dir, options)?;
        debug!("Generated manifest with {} entries from {:?}", mods.len(), dir);
        Ok(Self::new(name, mods))
    }

    /// Read and validate a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| ManifestError::io(path, e))?;
        if metadata.len() > MAX_MANIFEST_BYTES {
            return Err(ManifestError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
            });
        }

        let content = fs::read(path).map_err(|e| ManifestError::io(path, e))?;
        let manifest: Manifest = serde_json::from_slice(&content).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Load the manifest at `path`, or `None` if the file does not exist yet
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Serialized form written to disk.
    ///
    /// Pretty-printed with a trailing newline. The same manifest always
    /// yields the same bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| ManifestError::Invalid(format!("failed to serialize manifest: {}", e)))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn mods(&self) -> &[ModEntry] {
        &self.modpack.mods
    }

    pub fn find(&self, name: &str) -> Option<&ModEntry> {
        self.modpack.mods.iter().find(|m| m.name == name)
    }

    /// Validate manifest structure
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for entry in &self.modpack.mods {
            if !is_valid_mod_name(&entry.name) {
                return Err(ManifestError::Invalid(format!("invalid mod name: {:?}", entry.name)));
            }

            if !seen.insert(entry.name.as_str()) {
                return Err(ManifestError::Invalid(format!("duplicate mod name: {}", entry.name)));
            }

            if !is_sha256_hex(&entry.sha256) {
                return Err(ManifestError::Invalid(format!(
                    "invalid sha256 for {}: {:?}",
                    entry.name, entry.sha256
                )));
            }
        }

        Ok(())
    }
}

pub(crate) fn is_valid_mod_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn is_sha256_hex(digest: &str) -> bool {
    digest.len() == 64 && digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
