//! Mod Directory Scanner
//!
//! Lists the top-level files of a mod directory and hashes them.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, trace, warn};

use crate::error::{ManifestError, Result};
use crate::types::{is_valid_mod_name, ModEntry};

const HASH_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Keep only files with one of these extensions (case-insensitive).
    /// Empty keeps every file.
    pub extensions: Vec<String>,
    /// Prefix joined onto each name to form [`ModEntry::file`]
    pub file_prefix: String,
    /// A path that is never listed, normally the manifest itself
    pub exclude: Option<PathBuf>,
}

impl ScanOptions {
    fn accepts(&self, name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    fn file_path(&self, name: &str) -> String {
        let prefix = self.file_prefix.replace('\\', "/");
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() || prefix == "." {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        }
    }
}

/// Build one entry per regular file directly inside `dir`, sorted by name
pub fn scan_dir(dir: &Path, options: &ScanOptions) -> Result<Vec<ModEntry>> {
    let mut entries = Vec::new();
    let excluded = options.exclude.as_deref().and_then(|p| fs::canonicalize(p).ok());

    for (name, path) in list_files(dir)? {
        if !options.accepts(&name) {
            trace!("Skipping {:?}: extension filtered", path);
            continue;
        }

        if excluded.is_some() && fs::canonicalize(&path).ok() == excluded {
            debug!("Skipping {:?}: excluded from scan", path);
            continue;
        }

        // Same rule `Manifest::validate` applies, so a written manifest always loads back
        if !is_valid_mod_name(&name) {
            return Err(ManifestError::Invalid(format!("unsupported mod file name: {:?}", name)));
        }

        let (sha256, size) = hash_file(&path)?;
        entries.push(ModEntry {
            file: options.file_path(&name),
            name,
            sha256,
            size,
            url: None,
        });
    }

    debug!("Scanned {} mod files in {:?}", entries.len(), dir);
    Ok(entries)
}

/// Streamed SHA-256 of a file. Returns the lowercase hex digest and byte count.
pub fn hash_file(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path).map_err(|e| ManifestError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    let mut size = 0u64;

    loop {
        let n = file.read(&mut buffer).map_err(|e| ManifestError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        size += n as u64;
    }

    Ok((hex::encode(hasher.finalize()), size))
}

/// Regular files directly inside `dir` as `(name, path)`, sorted by name.
///
/// Directories, dotfiles and editor temp files are skipped.
pub(crate) fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Err(ManifestError::MissingDir(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| ManifestError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ManifestError::io(dir, e))?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            return Err(ManifestError::NonUtf8Name(path));
        };

        if is_ignored(&name) {
            trace!("Skipping ignored file {:?}", path);
            continue;
        }

        // Follows symlinks: a link to a file counts, a link to a directory does not
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && is_symlink(&path) => {
                warn!("Skipping broken symlink {:?}", path);
                continue;
            }
            Err(e) => return Err(ManifestError::io(&path, e)),
        };
        if !metadata.is_file() {
            continue;
        }

        files.push((name, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name.ends_with(".tmp") || name.ends_with(".swp") || name.ends_with('~')
}
