use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use seedbed_engine::{CommandError, Options, Orchestrator, Request, ValidationError};
use seedbed_registry::{DEFAULT_ENVIRONMENT, Project};
use seedbed_sqlite::SqliteConnector;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod reporter;

use reporter::TerminalReporter;

#[derive(Debug, Parser)]
#[command(name = "seedbed", version)]
#[command(about = "Create, drop, and seed database tables from model and fixture definitions")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Print the generated statements after each operation.
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set
    )]
    verbose: bool,
    /// Environment whose connections are used.
    #[arg(long, global = true, env = "SEEDBED_ENV", default_value = DEFAULT_ENVIRONMENT)]
    env: String,
    /// Project configuration file.
    #[arg(long, global = true, default_value = "seedbed.yml")]
    config: PathBuf,
    /// Load each model's fixture in a single transaction.
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    transactional: Option<bool>,
    /// Include data when dumping (reserved, currently ignored).
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    data: Option<bool>,
    /// Dump target file (reserved, currently ignored).
    #[arg(long, global = true)]
    file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recreate the models' tables and load their fixtures.
    Reload {
        /// Comma-separated model names (default: all).
        models: Option<String>,
    },
    /// Run a schema action: create, drop, dump, or truncate.
    Schema {
        action: Option<String>,
        /// Comma-separated model names (default: all).
        models: Option<String>,
    },
    /// Run a fixture action: load.
    Fixtures {
        action: Option<String>,
        /// Comma-separated model names (default: all fixtures).
        models: Option<String>,
    },
}

impl Command {
    fn request(&self) -> Result<Request, CommandError> {
        match self {
            Command::Reload { models } => Request::reload(models.as_deref()),
            Command::Schema { action, models } => {
                Request::schema(action.as_deref(), models.as_deref())
            }
            Command::Fixtures { action, models } => {
                Request::fixtures(action.as_deref(), models.as_deref())
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(&cli) {
        if let CommandError::Validation(ValidationError::MissingAction { command }) = &err {
            print_subcommand_help(command);
        } else {
            eprintln!("error: {err}");
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CommandError> {
    // Validate the invocation before touching the project.
    let request = cli.command.request()?;
    if cli.global.data.is_some() || cli.global.file.is_some() {
        debug!(data = ?cli.global.data, file = ?cli.global.file, "dump options are accepted but ignored");
    }

    let project = Project::load(&cli.global.config, &cli.global.env)?;
    let connector = SqliteConnector::from_project(&project);
    let options = Options {
        verbose: cli.global.verbose,
        transactional: cli
            .global
            .transactional
            .unwrap_or(project.config().fixtures.transactional),
    };

    let stdout = io::stdout();
    let mut reporter = TerminalReporter::new(stdout.lock());
    Orchestrator::new(&project, &connector, &mut reporter, options).execute(&request)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();
}

fn print_subcommand_help(name: &str) {
    let mut cli = Cli::command();
    match cli.find_subcommand_mut(name) {
        Some(sub) => eprintln!("{}", sub.render_help()),
        None => eprintln!("{}", cli.render_help()),
    }
}
