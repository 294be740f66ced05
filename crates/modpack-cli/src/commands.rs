//! Local subcommands: generate, check, diff, verify

use std::path::Path;

use anyhow::Context;
use modpack_manifest::{verify_folder, write_if_changed, Manifest, VerifyReport, WriteOutcome};
use tracing::{info, warn};

use crate::config::Settings;
use crate::publish::{regenerate, PublishOutcome};

pub fn generate(settings: &Settings) -> anyhow::Result<WriteOutcome> {
    let regenerated = regenerate(settings)?;
    let outcome = write_if_changed(&settings.output, &regenerated.bytes)
        .with_context(|| format!("failed to write {}", settings.output.display()))?;

    info!(
        "{} mods, manifest {} ({})",
        regenerated.manifest.mods().len(),
        outcome,
        regenerated.diff.summary()
    );
    Ok(outcome)
}

/// True when the manifest on disk is byte-identical to a fresh one
pub fn check(settings: &Settings) -> anyhow::Result<bool> {
    let regenerated = regenerate(settings)?;

    let current = match std::fs::read(&settings.output) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Manifest {} does not exist", settings.output.display());
            return Ok(false);
        }
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", settings.output.display())),
    };

    if current == regenerated.bytes {
        info!("Manifest {} is up to date", settings.output.display());
        return Ok(true);
    }

    warn!(
        "Manifest {} is stale ({}); run `modpack generate`",
        settings.output.display(),
        regenerated.diff.summary()
    );
    Ok(false)
}

/// Print pending entry changes. True when there are none.
pub fn diff(settings: &Settings) -> anyhow::Result<bool> {
    let regenerated = regenerate(settings)?;
    for line in regenerated.diff.lines() {
        println!("{}", line);
    }
    info!("{}", regenerated.diff.summary());
    Ok(regenerated.diff.is_empty())
}

pub fn verify(settings: &Settings, folder: &Path, manifest: Option<&Path>) -> anyhow::Result<bool> {
    let manifest_path = manifest.unwrap_or(settings.output.as_path());
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("failed to load manifest {}", manifest_path.display()))?;

    let report = verify_folder(&manifest, folder)?;
    print_report(&report);
    Ok(report.is_clean())
}

fn print_report(report: &VerifyReport) {
    for name in &report.missing {
        println!("missing     {}", name);
    }
    for name in &report.outdated {
        println!("outdated    {}", name);
    }
    for name in &report.extraneous {
        println!("extraneous  {}", name);
    }
    info!(
        "{} up to date, {} missing, {} outdated, {} extraneous",
        report.up_to_date.len(),
        report.missing.len(),
        report.outdated.len(),
        report.extraneous.len()
    );
}

pub fn print_publish_outcome(outcome: &PublishOutcome) {
    match outcome {
        PublishOutcome::Unchanged => info!("No manifest changes"),
        PublishOutcome::DryRun(diff) => {
            for line in diff.lines() {
                println!("{}", line);
            }
            info!("Dry run: {}", diff.summary());
        }
        PublishOutcome::Committed => info!("Manifest committed"),
        PublishOutcome::Pushed => info!("Manifest committed and pushed"),
    }
}
