//! Configuration
//!
//! Defaults, then an optional JSON config file, then environment/CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use modpack_manifest::{ScanOptions, MANIFEST_FILE_NAME};
use serde::Deserialize;
use tracing::debug;

pub const LOCAL_CONFIG_FILE: &str = "modpack.json";

const DEFAULT_MODS_DIR: &str = "mods";
const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_GIT_HOST: &str = "github.com";
const DEFAULT_COMMIT_MESSAGE: &str = "Update mod manifest";
const DEFAULT_COMMIT_NAME: &str = "github-actions[bot]";
const DEFAULT_COMMIT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// On-disk config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub mods_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub file_prefix: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub name: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub git_host: Option<String>,
    pub commit_message: Option<String>,
    pub commit_name: Option<String>,
    pub commit_email: Option<String>,
}

/// Values taken from flags and environment variables
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mods_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mods_dir: PathBuf,
    pub output: PathBuf,
    pub scan: ScanOptions,
    pub name: Option<String>,
    pub remote: String,
    pub branch: Option<String>,
    pub git_host: String,
    pub commit_message: String,
    pub identity: Identity,
}

impl Settings {
    pub fn resolve(explicit_config: Option<&Path>, overrides: &Overrides, cwd: &Path) -> anyhow::Result<Self> {
        let file = match load_file_config(explicit_config, cwd)? {
            Some((path, config)) => {
                debug!("Using config file {:?}", path);
                config
            }
            None => FileConfig::default(),
        };

        Ok(Self::from_layers(file, overrides, cwd))
    }

    fn from_layers(file: FileConfig, overrides: &Overrides, cwd: &Path) -> Self {
        let mods_dir = overrides
            .mods_dir
            .clone()
            .or(file.mods_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODS_DIR));
        let output = overrides
            .output
            .clone()
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(MANIFEST_FILE_NAME));

        let file_prefix = file.file_prefix.unwrap_or_else(|| default_file_prefix(&mods_dir, cwd));
        let output = cwd.join(output);

        Self {
            mods_dir: cwd.join(mods_dir),
            // The manifest may live inside the mod directory; it must never list itself
            scan: ScanOptions {
                extensions: file.extensions.unwrap_or_else(|| vec!["jar".to_string()]),
                file_prefix,
                exclude: Some(output.clone()),
            },
            output,
            name: overrides.name.clone().or(file.name),
            remote: file.remote.unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            branch: file.branch,
            git_host: file.git_host.unwrap_or_else(|| DEFAULT_GIT_HOST.to_string()),
            commit_message: file
                .commit_message
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            identity: Identity {
                name: file.commit_name.unwrap_or_else(|| DEFAULT_COMMIT_NAME.to_string()),
                email: file.commit_email.unwrap_or_else(|| DEFAULT_COMMIT_EMAIL.to_string()),
            },
        }
    }
}

/// Download prefix derived from the mod directory as written in config
fn default_file_prefix(mods_dir: &Path, cwd: &Path) -> String {
    let relative = if mods_dir.is_absolute() {
        mods_dir.strip_prefix(cwd).unwrap_or(Path::new(""))
    } else {
        mods_dir
    };

    relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// User-level config location (`~/.config/modpack-manifest/config.json` on Linux)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("modpack-manifest").join("config.json"))
}

fn load_file_config(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Option<(PathBuf, FileConfig)>> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        let config = read_file_config(&path)?;
        return Ok(Some((path, config)));
    }

    let candidates = std::iter::once(cwd.join(LOCAL_CONFIG_FILE)).chain(user_config_path());
    for path in candidates {
        if path.is_file() {
            let config = read_file_config(&path)?;
            return Ok(Some((path, config)));
        }
    }

    Ok(None)
}

fn read_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cwd = Path::new("/repo");
        let settings = Settings::from_layers(FileConfig::default(), &Overrides::default(), cwd);

        assert_eq!(settings.mods_dir, PathBuf::from("/repo/mods"));
        assert_eq!(settings.output, PathBuf::from("/repo/manifest.json"));
        assert_eq!(settings.scan.file_prefix, "mods");
        assert_eq!(settings.scan.extensions, vec!["jar"]);
        assert_eq!(settings.scan.exclude, Some(PathBuf::from("/repo/manifest.json")));
        assert_eq!(settings.remote, "origin");
        assert_eq!(settings.identity.name, "github-actions[bot]");
        assert!(settings.name.is_none());
    }

    #[test]
    fn test_overrides_beat_file() {
        let cwd = Path::new("/repo");
        let file = FileConfig {
            mods_dir: Some(PathBuf::from("pack/mods")),
            name: Some("From File".into()),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            mods_dir: Some(PathBuf::from("your-modpack-repo/mods")),
            output: None,
            name: Some("From Flag".into()),
        };

        let settings = Settings::from_layers(file, &overrides, cwd);
        assert_eq!(settings.mods_dir, PathBuf::from("/repo/your-modpack-repo/mods"));
        assert_eq!(settings.scan.file_prefix, "your-modpack-repo/mods");
        assert_eq!(settings.name.as_deref(), Some("From Flag"));
    }

    #[test]
    fn test_explicit_prefix_kept() {
        let file = FileConfig {
            file_prefix: Some("cdn/mods".into()),
            ..FileConfig::default()
        };
        let settings = Settings::from_layers(file, &Overrides::default(), Path::new("/repo"));
        assert_eq!(settings.scan.file_prefix, "cdn/mods");
    }

    #[test]
    fn test_absolute_mods_dir_prefix() {
        assert_eq!(default_file_prefix(Path::new("/repo/a/mods"), Path::new("/repo")), "a/mods");
        assert_eq!(default_file_prefix(Path::new("/elsewhere/mods"), Path::new("/repo")), "");
        assert_eq!(default_file_prefix(Path::new("./mods/"), Path::new("/repo")), "mods");
    }

    #[test]
    fn test_local_config_file_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            r#"{"mods_dir": "content/mods", "extensions": ["jar", "zip"], "commit_message": "Refresh mods"}"#,
        )
        .unwrap();

        let settings = Settings::resolve(None, &Overrides::default(), dir.path()).unwrap();
        assert_eq!(settings.mods_dir, dir.path().join("content/mods"));
        assert_eq!(settings.scan.extensions, vec!["jar", "zip"]);
        assert_eq!(settings.commit_message, "Refresh mods");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"mod_dir": "typo"}"#).unwrap();

        assert!(Settings::resolve(Some(&path), &Overrides::default(), dir.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(Settings::resolve(Some(&missing), &Overrides::default(), dir.path()).is_err());
    }
}
