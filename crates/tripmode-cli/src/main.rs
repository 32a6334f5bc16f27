mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, contacts, import, matching, users, validate, Context};
use crate::error::{exit_code_for, report_error};
use tripmode_config as config;
use tripmode_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "tripmode", version, about = "Trip Mode contact import CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// Import contacts from a file or the platform picker
    #[command(subcommand)]
    Import(import::ImportCommand),
    /// Parse a contact file and report valid and invalid entries
    Validate(validate::ValidateArgs),
    #[command(subcommand)]
    Contacts(contacts::ContactsCommand),
    #[command(subcommand)]
    Users(users::UsersCommand),
    /// Link an owner's contacts to registered users
    Match(matching::MatchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    match command {
        Command::Completions(args) => completions::emit(args),
        Command::Validate(args) => validate::validate_file(json, &app_config, args),
        Command::Import(import::ImportCommand::Method) => import::describe_method(json, &app_config),
        command => {
            let db_path =
                paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
            debug!(path = %db_path.display(), "database path resolved");

            let store = Store::open(&db_path)
                .with_context(|| format!("open database {}", db_path.display()))?;
            store.migrate().with_context(|| "run migrations")?;

            let ctx = Context {
                store: &store,
                json,
                config: &app_config,
            };

            match command {
                Command::Import(import::ImportCommand::File(args)) => import::import_file(&ctx, args),
                Command::Import(import::ImportCommand::Picker(args)) => {
                    import::import_picker(&ctx, args)
                }
                Command::Contacts(cmd) => match cmd {
                    contacts::ContactsCommand::List(args) => contacts::list_contacts(&ctx, args),
                    contacts::ContactsCommand::Delete(args) => contacts::delete_contact(&ctx, args),
                },
                Command::Users(cmd) => match cmd {
                    users::UsersCommand::Add(args) => users::add_user(&ctx, args),
                    users::UsersCommand::List => users::list_users(&ctx),
                },
                Command::Match(args) => matching::match_contacts(&ctx, args),
                Command::Import(import::ImportCommand::Method)
                | Command::Completions(_)
                | Command::Validate(_) => {
                    unreachable!("command handled before store initialization")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
