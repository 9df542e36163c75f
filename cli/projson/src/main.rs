//! projson: inspect `project.json` descriptors from the command line.

mod commands;
mod locate;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use projson_model::ReadSettings;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PROJSON_LOG";

#[derive(Parser)]
#[command(name = "projson", version, about = "Read and inspect project.json descriptors")]
struct Cli {
    /// Log pipeline stages (same as PROJSON_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Snapshot token substituted into `-*` versions [default: $DOTNET_BUILD_VERSION]
    #[arg(long, global = true)]
    build_version: Option<String>,

    /// Assembly file version override, `7` or `1.2.3.7` [default: $DOTNET_ASSEMBLY_FILE_VERSION]
    #[arg(long, global = true)]
    file_version: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a descriptor and print the project model
    Inspect {
        /// Descriptor file or its directory (default: search upward for project.json)
        path: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the effective compiler options for a configuration
    Options {
        /// Descriptor file or its directory (default: search upward for project.json)
        path: Option<PathBuf>,
        /// Configuration name (e.g., Debug, Release)
        #[arg(long, default_value = "Debug")]
        configuration: String,
        /// Target framework (e.g., net45, dnxcore50)
        #[arg(long)]
        framework: Option<String>,
    },
    /// Show how framework tokens resolve
    Framework {
        /// Framework tokens (e.g., net45, net40-client, portable-net45+win8)
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Write a package props file importing the given props files
    Props {
        /// Primary props file to import
        #[arg(long)]
        import: String,
        /// Further props files to import
        #[arg(long = "additional")]
        additional: Vec<String>,
        /// File to write
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

/// Run the selected command. `Ok(false)` means it completed but found
/// errors worth a failing exit status.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let settings = read_settings(cli.build_version, cli.file_version);

    match cli.command {
        Commands::Inspect { path, format } => {
            let descriptor = locate::resolve(path.as_deref())?;
            commands::inspect::run(&descriptor, settings, format)
        }
        Commands::Options {
            path,
            configuration,
            framework,
        } => {
            let descriptor = locate::resolve(path.as_deref())?;
            commands::options::run(&descriptor, settings, &configuration, framework.as_deref())?;
            Ok(true)
        }
        Commands::Framework { tokens } => Ok(commands::framework::run(&tokens)),
        Commands::Props {
            import,
            additional,
            output,
        } => {
            commands::props::run(&import, &additional, &output)?;
            Ok(true)
        }
    }
}

/// Settings from the environment, with explicit flags taking precedence.
fn read_settings(build_version: Option<String>, file_version: Option<String>) -> ReadSettings {
    let mut settings = ReadSettings::from_env();
    if let Some(token) = build_version {
        settings = settings.with_build_version(token);
    }
    if let Some(version) = file_version {
        settings = settings.with_assembly_file_version(version);
    }
    settings
}
