//! Publish
//!
//! Regenerate the manifest, then commit and push it when git sees a change.

use std::time::Duration;

use anyhow::{bail, Context};
use modpack_manifest::{write_if_changed, Manifest, ManifestDiff};
use tracing::{info, warn};

use crate::config::Settings;
use crate::git::{Git, PushTarget};

#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub no_push: bool,
    pub dry_run: bool,
    pub branch: Option<String>,
    pub message: Option<String>,
    pub token: Option<String>,
    pub repository: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Nothing to commit
    Unchanged,
    /// `--dry-run`: what would have been written
    DryRun(ManifestDiff),
    Committed,
    Pushed,
}

/// Manifest freshly built from the mod directory, alongside the copy on disk
pub struct Regenerated {
    pub previous: Option<Manifest>,
    pub manifest: Manifest,
    pub bytes: Vec<u8>,
    pub diff: ManifestDiff,
}

pub fn regenerate(settings: &Settings) -> anyhow::Result<Regenerated> {
    let previous = match Manifest::load_optional(&settings.output) {
        Ok(previous) => previous,
        Err(e) => {
            warn!("Ignoring unreadable manifest {}: {}", settings.output.display(), e);
            None
        }
    };

    let manifest = Manifest::generate(&settings.mods_dir, &settings.scan, settings.name.clone())
        .with_context(|| format!("failed to scan {}", settings.mods_dir.display()))?;
    let bytes = manifest.to_json_bytes()?;
    let diff = ManifestDiff::between(previous.as_ref(), &manifest);

    Ok(Regenerated {
        previous,
        manifest,
        bytes,
        diff,
    })
}

pub async fn publish(settings: &Settings, options: &PublishOptions) -> anyhow::Result<PublishOutcome> {
    let regenerated = regenerate(settings)?;
    info!(
        "Scanned {} mods ({})",
        regenerated.manifest.mods().len(),
        regenerated.diff.summary()
    );

    if regenerated.previous.is_none() {
        info!("No manifest at {} yet", settings.output.display());
    }

    if options.dry_run {
        return Ok(PublishOutcome::DryRun(regenerated.diff));
    }

    let outcome = write_if_changed(&settings.output, &regenerated.bytes)
        .with_context(|| format!("failed to write {}", settings.output.display()))?;

    let work_dir = settings
        .output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let git = Git::discover(work_dir, options.timeout).await?;
    let manifest_path = git.relative(&settings.output)?;

    if !git.has_changes(&manifest_path).await? {
        info!("Manifest {} and matches HEAD, nothing to commit", outcome);
        return Ok(PublishOutcome::Unchanged);
    }

    // Resolve the destination first so a bad branch setup fails before committing
    let target = if options.no_push {
        None
    } else {
        Some(push_target(&git, settings, options).await?)
    };

    let message = commit_message(
        options.message.as_deref().unwrap_or(&settings.commit_message),
        &regenerated.diff,
    );
    git.commit(&manifest_path, &message, &settings.identity).await?;

    let Some(target) = target else {
        info!("--no-push given, leaving commit in {}", git.root().display());
        return Ok(PublishOutcome::Committed);
    };

    git.push(&target).await?;
    Ok(PublishOutcome::Pushed)
}

fn commit_message(subject: &str, diff: &ManifestDiff) -> String {
    if diff.is_empty() {
        return subject.to_string();
    }

    let mut message = format!("{}\n\n{}\n", subject, diff.summary());
    for line in diff.lines() {
        message.push('\n');
        message.push_str(&line);
    }
    message
}

async fn push_target(git: &Git, settings: &Settings, options: &PublishOptions) -> anyhow::Result<PushTarget> {
    let branch = match options.branch.clone().or_else(|| settings.branch.clone()) {
        Some(branch) => branch,
        None => match git.current_branch().await? {
            Some(branch) => branch,
            None => bail!("HEAD is detached; pass --branch to choose where to push"),
        },
    };

    let target = match (&options.token, &options.repository) {
        (Some(token), Some(repository)) if !token.is_empty() => PushTarget::Authenticated {
            host: settings.git_host.clone(),
            repository: repository.clone(),
            token: token.clone(),
            branch,
        },
        _ => PushTarget::Remote {
            remote: settings.remote.clone(),
            branch,
        },
    };

    Ok(target)
}
