//! Manifest Writer
//!
//! Writes the manifest only when its bytes change, via a temp file and rename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ManifestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

impl WriteOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, WriteOutcome::Unchanged)
    }
}

impl std::fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WriteOutcome::Created => "created",
            WriteOutcome::Updated => "updated",
            WriteOutcome::Unchanged => "unchanged",
        };
        f.write_str(label)
    }
}

pub fn write_if_changed(path: &Path, bytes: &[u8]) -> Result<WriteOutcome> {
    let outcome = match fs::read(path) {
        Ok(current) if current == bytes => {
            debug!("{:?} already up to date", path);
            return Ok(WriteOutcome::Unchanged);
        }
        Ok(_) => WriteOutcome::Updated,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => WriteOutcome::Created,
        Err(e) => return Err(ManifestError::io(path, e)),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ManifestError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, bytes).map_err(|e| ManifestError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ManifestError::io(path, e));
    }

    info!("Manifest {}: {:?}", outcome, path);
    Ok(outcome)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
