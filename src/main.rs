use clap::{Parser, Subcommand};
use desktop_shortcuts::ShortcutSet;
use desktop_shortcuts::config::{self, CURRENT_DESKTOP_VAR};
use desktop_shortcuts::keyfile::KeyFile;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "desktop-shortcuts",
    about = "List and launch the shortcut actions of a desktop file"
)]
struct Args {
    /// Path to config file (default: ~/.config/desktop-shortcuts/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Desktop environment to filter shortcuts for (default: config, then $XDG_CURRENT_DESKTOP)
    #[arg(short, long)]
    identity: Option<String>,

    /// Desktop file to read
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every visible shortcut as "nick<TAB>name"
    List,
    /// Print the display name of a shortcut
    Name { nick: String },
    /// Launch a shortcut
    Exec { nick: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            // Use miette's fancy error display
            eprintln!("{:?}", miette::Report::new(err));
            return ExitCode::FAILURE;
        }
    };

    let current_desktop = std::env::var(CURRENT_DESKTOP_VAR).ok();
    let Some(identity) = config.resolve_identity(args.identity, current_desktop) else {
        eprintln!("error: no identity given and ${CURRENT_DESKTOP_VAR} is not set");
        return ExitCode::FAILURE;
    };

    info!("loading shortcuts from {}", args.file.display());

    let source = match KeyFile::load(&args.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return ExitCode::FAILURE;
        }
    };
    let source = match config.languages {
        Some(languages) => source.with_languages(languages),
        None => source,
    };
    debug!(languages = ?source.languages(), identity = %identity, "resolved settings");

    let set = ShortcutSet::from_keyfile(source, identity);

    match args.command {
        Command::List => {
            for (nick, name) in set.shortcuts() {
                println!("{nick}\t{}", name.unwrap_or_default());
            }
            ExitCode::SUCCESS
        }
        Command::Name { nick } => match set.nick_get_name(&nick) {
            Some(name) => {
                println!("{name}");
                ExitCode::SUCCESS
            }
            None => ExitCode::FAILURE,
        },
        Command::Exec { nick } => {
            if set.nick_exec(&nick) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
