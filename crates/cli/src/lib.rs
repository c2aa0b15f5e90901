mod cat;
mod classpath;
mod describe;

use clap::{Parser, Subcommand};
use nestjar_core::LoaderConfig;
use nestjar_runtime::Launcher;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "nestjar",
    version,
    about = "Launches applications packaged with nested archives",
    long_about = "nestjar resolves types and resources from archives nested inside a single \
                  package without extracting them, applies the package's startup properties \
                  and runs its deferred entry point."
)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    /// Mirror log output to stderr
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the package's entry point and exit with its status
    Run {
        /// Packaged archive or unpacked package directory
        #[arg(value_name = "PACKAGE")]
        package: PathBuf,
        /// Arguments passed to the entry point
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the assembled classpath
    Classpath {
        #[arg(value_name = "PACKAGE")]
        package: PathBuf,
    },
    /// Print the entry point and startup properties
    Describe {
        #[arg(value_name = "PACKAGE")]
        package: PathBuf,
    },
    /// Write a resource resolved through the package loader to stdout
    Cat {
        #[arg(value_name = "PACKAGE")]
        package: PathBuf,
        /// Resource path, e.g. META-INF/MANIFEST.MF
        #[arg(value_name = "RESOURCE")]
        resource: String,
        /// Print where the resource was found instead of its content
        #[arg(long)]
        locate: bool,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Run { .. } => "run",
            Commands::Classpath { .. } => "classpath",
            Commands::Describe { .. } => "describe",
            Commands::Cat { .. } => "cat",
        }
    }
}

/// Parse the command line and execute it, returning the process exit status.
pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    let mut config = LoaderConfig::load(cli.config.as_deref())?;
    config.debug |= cli.debug;

    let component = match &cli.command {
        Commands::Run { .. } => "run",
        _ => "cli",
    };
    let _guard = nestjar_runtime::init_logging(component, &config, cli.log_stderr);

    execute(&Launcher::new(config), cli.command)
}

/// Execute a parsed subcommand with `launcher`.
pub fn execute(launcher: &Launcher, command: Commands) -> anyhow::Result<i32> {
    debug!("Running {} with {:?}", command.name(), launcher.config());
    match command {
        Commands::Run { package, args } => Ok(launcher.launch(&package, &args)),
        Commands::Classpath { package } => classpath::run(launcher, &package).map(|_| 0),
        Commands::Describe { package } => describe::run(launcher, &package).map(|_| 0),
        Commands::Cat {
            package,
            resource,
            locate,
        } => cat::run(launcher, &package, &resource, locate).map(|_| 0),
    }
}
