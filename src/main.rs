use anyhow::Context;
use clap::Parser;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use uv_metadata::config::{self, INSTALLER_ENV, Settings};
use uv_metadata::{LookupRequest, colors, get_metadata, report};

const EXAMPLES: &str = "\
Examples:
    uv-metadata requests
    uv-metadata .
    uv-metadata git+https://github.com/zsimic/uv-metadata@main";

#[derive(Parser)]
#[command(name = "uv-metadata")]
#[command(author, version, about = "Output the metadata of a package, in machine-readable format", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Python interpreter to use (default: major.minor of python3 on PATH)
    #[arg(short, long)]
    python: Option<String>,

    /// Show only this key from the metadata
    #[arg(short, long)]
    key: Option<String>,

    /// Installer executable
    #[arg(long, env = INSTALLER_ENV, default_value = config::DEFAULT_INSTALLER)]
    installer: PathBuf,

    /// Log each command that is run
    #[arg(short, long)]
    verbose: bool,

    /// Show metadata for specified package
    #[arg(default_value = ".")]
    package: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    colors::init_colors();
    init_tracing(cli.verbose);

    let text = match run(&cli) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{} {:#}", colors::error_prefix(), err);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        // Reader went away (e.g. `| head`), nothing left to report
        Err(err) if err.kind() == ErrorKind::BrokenPipe => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} failed to write report: {}", colors::error_prefix(), err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let settings = Settings::resolve(cli.installer.clone(), cli.python.clone());
    let package = config::resolve_package_spec(&cli.package)
        .with_context(|| format!("Cannot resolve path '{}'", cli.package))?;

    let request = LookupRequest::new(package, settings.python.clone());
    let fields = get_metadata(&settings.installer, &request)?;
    Ok(report::render(&fields, cli.key.as_deref())?)
}
