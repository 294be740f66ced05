mod cli;
mod commands;
mod config;
mod git;
mod logging;
mod publish;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use cli::{Args, Command};
use config::{Overrides, Settings};
use publish::PublishOptions;

/// Stale manifest or unclean folder
const EXIT_DIRTY: u8 = 1;
/// Anything that prevented the command from running to completion
const EXIT_ERROR: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_DIRTY),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let cwd = std::env::current_dir()?;
    let overrides = Overrides {
        mods_dir: args.mods_dir,
        output: args.output,
        name: args.name,
    };
    let settings = Settings::resolve(args.config.as_deref(), &overrides, &cwd)?;

    match args.command {
        Command::Generate => {
            commands::generate(&settings)?;
            Ok(true)
        }
        Command::Check => commands::check(&settings),
        Command::Diff => commands::diff(&settings),
        Command::Verify { folder, manifest } => {
            commands::verify(&settings, &cwd.join(folder), manifest.map(|m| cwd.join(m)).as_deref())
        }
        Command::Publish(publish_args) => {
            let options = PublishOptions {
                no_push: publish_args.no_push,
                dry_run: publish_args.dry_run,
                branch: publish_args.branch.filter(|b| !b.is_empty()),
                message: publish_args.message,
                token: publish_args.token,
                repository: publish_args.repository,
                timeout: Duration::from_secs(publish_args.git_timeout),
            };
            let outcome = publish::publish(&settings, &options).await?;
            commands::print_publish_outcome(&outcome);
            Ok(true)
        }
    }
}
