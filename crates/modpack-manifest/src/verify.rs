//! Local Folder Verification
//!
//! Compares an installed mod folder against a manifest, the same way the
//! updater decides what to download and what to remove. Nothing is modified.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::scan::{hash_file, list_files};
use crate::types::Manifest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub up_to_date: Vec<String>,
    pub missing: Vec<String>,
    pub outdated: Vec<String>,
    pub extraneous: Vec<String>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.outdated.is_empty() && self.extraneous.is_empty()
    }
}

pub fn verify_folder(manifest: &Manifest, folder: &Path) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();

    let local = if folder.is_dir() {
        list_files(folder)?
    } else {
        debug!("Mod folder {:?} does not exist", folder);
        Vec::new()
    };
    let local_names: HashSet<&str> = local.iter().map(|(name, _)| name.as_str()).collect();

    for entry in manifest.mods() {
        if !local_names.contains(entry.name.as_str()) {
            report.missing.push(entry.name.clone());
            continue;
        }

        let (digest, _) = hash_file(&folder.join(&entry.name))?;
        if digest == entry.sha256 {
            report.up_to_date.push(entry.name.clone());
        } else {
            report.outdated.push(entry.name.clone());
        }
    }

    let wanted: HashSet<&str> = manifest.mods().iter().map(|m| m.name.as_str()).collect();
    report.extraneous = local
        .iter()
        .filter(|(name, _)| !wanted.contains(name.as_str()))
        .map(|(name, _)| name.clone())
        .collect();

    Ok(report)
}
