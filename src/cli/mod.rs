mod commands;
pub mod error;
pub mod utils;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Overrides};
use crate::context::RegistryContext;
use error::CliResult;
use utils::{CommandOutput, OutputFormat};

#[derive(Parser)]
#[command(name = "docreg")]
#[command(author, version, about = "Document registry with change tracking", long_about = None)]
pub struct Cli {
    /// Config file (default: ./docreg.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Document root directory (overrides DOCREG_ROOT and the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// State directory for fingerprints, stats and history (overrides DOCREG_STATE_DIR)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// File extension to load, repeatable (default: md)
    #[arg(long = "ext", global = true)]
    pub extensions: Vec<String>,

    /// Output format (table or json)
    #[arg(long, global = true, default_value = "table")]
    pub format: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents under the root
    Load,
    /// Fingerprint every document and report new or modified ones
    Track,
    /// Classify a file as created, modified or unchanged and store its fingerprint
    Detect {
        /// File to check
        file: String,
    },
    /// Detect a change, refresh the cache and notify dependents
    Process {
        /// Changed file
        file: String,
    },
    /// Notify dependents of a file without change detection
    Dispatch {
        /// Changed file
        file: String,
    },
    /// Compare a sample of cached documents against their files
    Verify {
        /// Number of documents to sample
        #[arg(long)]
        sample: Option<usize>,
    },
    /// Show registry status
    Status,
    /// Show recent dispatch results
    History {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show which standards each component satisfies
    Standards {
        /// Only show this component
        #[arg(long)]
        component: Option<String>,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            root: self.root.clone(),
            state_dir: self.state_dir.clone(),
            extensions: self.extensions.clone(),
        }
    }
}

/// Initialize tracing subscriber with env filter, logging to stderr
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "docreg=debug" } else { "docreg=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = cli.overrides();
    let Some(command) = cli.command else {
        // Show help when no command provided
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match execute(&overrides, &cli.format, command) {
        Ok(output) => {
            println!("{}", output.text);
            if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

fn execute(overrides: &Overrides, format: &str, command: Commands) -> CliResult<CommandOutput> {
    let format = OutputFormat::parse(format)?;
    let config = Config::resolve(overrides)?;
    let mut ctx = RegistryContext::init(config)?;

    let output = match command {
        Commands::Load => commands::documents::load(&ctx, format)?,
        Commands::Track => commands::documents::track(&mut ctx, format)?,
        Commands::Detect { file } => commands::detect::detect(&mut ctx, &file, format)?,
        Commands::Process { file } => commands::detect::process(&mut ctx, &file, format)?,
        Commands::Dispatch { file } => commands::dispatch::dispatch(&ctx, &file, format)?,
        Commands::Verify { sample } => commands::verify::verify(&ctx, sample, format)?,
        Commands::Status => commands::verify::status(&ctx, format)?,
        Commands::History { limit } => commands::dispatch::history(&ctx, limit, format)?,
        Commands::Standards { component } => {
            commands::standards::standards(&ctx, component.as_deref(), format)?
        }
    };

    ctx.teardown()?;
    Ok(output)
}
