use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use plugin_version::cli::orchestration::{
    load_synchronizer, run_version_workflow, VersionAction, VersionWorkflowArgs,
};
use plugin_version::ui;
use plugin_version::version::VersionBump;

#[derive(Parser)]
#[command(
    name = "plugin-version",
    version,
    about = "Keep a plugin's version string in sync across its files"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = ".",
        help = "Project root directory"
    )]
    dir: PathBuf,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current plugin version
    Version,

    /// Write a version to every target file
    Set {
        #[arg(
            value_name = "VERSION",
            help = "New version; defaults to re-stamping the current one"
        )]
        new_version: Option<String>,

        #[arg(short, long, help = "Skip prompts")]
        force: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Increment the current version and write it to every target file
    Bump {
        #[arg(value_enum)]
        part: VersionBump,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Print the resolved plugin name
    Name,

    /// List the files that carry the version string
    Targets,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Runs the selected command, returning whether every target succeeded.
fn run(args: Args) -> Result<bool> {
    let sync = load_synchronizer(&args.dir, args.config.as_deref())?;

    let action = match args.command {
        Command::Version => {
            let version = sync.current_version()?;
            ui::display_header_stderr(sync.plugin_name(), version.as_str());
            println!("{}", version);
            return Ok(true);
        }
        Command::Name => {
            println!("{}", sync.plugin_name());
            return Ok(true);
        }
        Command::Targets => {
            ui::display_targets(&sync.targets());
            return Ok(true);
        }
        Command::Set {
            new_version,
            force,
            dry_run,
        } => VersionWorkflowArgs {
            action: VersionAction::Set(new_version),
            force,
            dry_run,
            interactive: std::io::stdin().is_terminal(),
        },
        Command::Bump { part, dry_run } => VersionWorkflowArgs {
            action: VersionAction::Bump(part),
            force: true,
            dry_run,
            interactive: false,
        },
    };

    let report = run_version_workflow(&sync, action)?;
    Ok(!report.has_failures())
}
