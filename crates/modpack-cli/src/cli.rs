use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "modpack", version, about = "Generate and publish the modpack manifest")]
pub struct Args {
    /// JSON config file (defaults to ./modpack.json, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the mod files
    #[arg(long = "dir", global = true, env = "MODPACK_MODS_DIR")]
    pub mods_dir: Option<PathBuf>,

    /// Manifest path to write
    #[arg(long, global = true, env = "MODPACK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Modpack display name stored in the manifest
    #[arg(long, global = true, env = "MODPACK_NAME")]
    pub name: Option<String>,

    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the manifest for the current mod directory
    Generate,
    /// Exit with status 1 if the manifest on disk is stale
    Check,
    /// Show entries that would change on regeneration
    Diff,
    /// Compare an installed mod folder against the manifest
    Verify {
        #[arg(long)]
        folder: PathBuf,
        /// Manifest to check against (defaults to the configured output)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Regenerate, commit and push the manifest if it changed
    Publish(PublishArgs),
}

#[derive(clap::Args, Debug)]
pub struct PublishArgs {
    /// Commit but do not push
    #[arg(long)]
    pub no_push: bool,

    /// Report what would change without writing or committing
    #[arg(long)]
    pub dry_run: bool,

    /// Branch to push to (defaults to the checked-out branch)
    #[arg(long, env = "GITHUB_REF_NAME")]
    pub branch: Option<String>,

    /// Commit subject line
    #[arg(long, short)]
    pub message: Option<String>,

    /// Token used for an authenticated HTTPS push
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// `owner/name` slug of the repository to push to
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Timeout for each git invocation, in seconds
    #[arg(long, default_value_t = crate::git::DEFAULT_TIMEOUT.as_secs())]
    pub git_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_publish() {
        let args = Args::try_parse_from([
            "modpack",
            "--dir",
            "your-modpack-repo/mods",
            "publish",
            "--no-push",
            "--branch",
            "main",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.mods_dir, Some(PathBuf::from("your-modpack-repo/mods")));
        assert_eq!(args.verbose, 1);
        match args.command {
            Command::Publish(publish) => {
                assert!(publish.no_push);
                assert!(!publish.dry_run);
                assert_eq!(publish.branch.as_deref(), Some("main"));
                assert_eq!(publish.git_timeout, 120);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verify_requires_folder() {
        assert!(Args::try_parse_from(["modpack", "verify"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["modpack", "-q", "-v", "check"]).is_err());
    }
}
