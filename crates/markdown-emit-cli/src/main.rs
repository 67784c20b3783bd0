use anyhow::{Context, Result};
use clap::Parser;
use markdown_emit::{
    extract_from_path, extract_from_reader, ExitCode, ExtractError, ExtractOptions, ExtractReport,
};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Report what would be written without touching the file system
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Log every fenced block and annotation
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors, and skip the list of written files
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to markdown file ('-' for stdin)
    #[arg(value_name = "FILE")]
    path: PathBuf,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => std::process::ExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            eprintln!("Error: {err:?}");
            match err.downcast_ref::<ExtractError>() {
                Some(extract_err) => std::process::ExitCode::from(extract_err.exit_code() as u8),
                None => std::process::ExitCode::FAILURE,
            }
        }
    }
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let options = ExtractOptions {
        dry_run: cli.dry_run,
    };
    debug!(path = %cli.path.display(), dry_run = cli.dry_run, "starting extraction");

    let report = emit_blocks(&cli.path, &options).with_context(|| {
        format!(
            "Unable to extract code blocks at path or stream: {}",
            cli.path.display()
        )
    })?;

    if cli.quiet {
        return Ok(());
    }
    print_report(&report)
}

fn emit_blocks(path: &Path, options: &ExtractOptions) -> Result<ExtractReport, ExtractError> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        extract_from_reader(&mut reader, options)
    } else {
        extract_from_path(path, options)
    }
}

fn print_report(report: &ExtractReport) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for file in &report.files {
        match writeln!(handle, "{}", file.path) {
            Ok(_) => {}
            Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
            Err(err) => {
                return Err(err).context(format!("Failed to print path: {}", file.path));
            }
        }
    }

    match handle.flush() {
        Ok(_) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}
