use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use imagedb_cli::runner::{self, RunOutcome};
use imagedb_cli::script;

/// Every action, timestamped, in the working directory.
const ACTIVITY_LOG: &str = "full_log.txt";
/// Failures only, timestamped, in the working directory.
const ERROR_LOG: &str = "error_log.txt";

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "imagedb")]
#[command(version)]
#[command(about = "Batch-import images into a SQLite database from a command script")]
#[command(long_about = "imagedb executes a plain-text command script against a SQLite store.\n\
    The import directive walks a directory tree, letterboxes every image\n\
    onto a fixed-size canvas, and stores the JPEG re-encoding as a blob.\n\n\
    Script directives:\n    \
    open_db <path>                                        open or create the store\n    \
    import_images_from_directory <dir> <category> <w> <h> import a directory tree\n    \
    close_db                                              close the store\n    \
    exit                                                  stop the run\n\n\
    Lines starting with '#' are comments; '/*' and '*/' lines delimit\n\
    block comments. The run halts on the first failed directive.")]
struct Cli {
    /// Path to the command script file
    #[arg(short = 'c', long = "cmd", value_name = "FILE")]
    cmd: PathBuf,
}

/// Installs the console sink plus the two file sinks. The returned guards
/// must live until process exit so buffered log lines flush.
fn init_logging() -> (WorkerGuard, WorkerGuard) {
    let activity = tracing_appender::rolling::never(".", ACTIVITY_LOG);
    let (activity_writer, activity_guard) = tracing_appender::non_blocking(activity);

    let errors = tracing_appender::rolling::never(".", ERROR_LOG);
    let (error_writer, error_guard) = tracing_appender::non_blocking(errors);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stdout),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(activity_writer),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(error_writer)
                .with_filter(LevelFilter::WARN),
        )
        .init();

    (activity_guard, error_guard)
}

fn main() {
    // The exit code is decided inside run_cli so the logging guards drop
    // (and flush the file sinks) before the process exits.
    std::process::exit(run_cli());
}

fn run_cli() -> i32 {
    let cli = Cli::parse();

    let _guards = init_logging();

    if !cli.cmd.is_file() {
        let _ = Cli::command().print_help();
        return 2;
    }

    info!("using command file: {}", cli.cmd.display());

    let commands = script::parse(&cli.cmd);
    match runner::run(&commands) {
        RunOutcome::Completed => 0,
        RunOutcome::Halted => 1,
    }
}
