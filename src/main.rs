// MP4J - desktop music player bootstrap
// Prepares the data root, probes connectivity, then hands off to the shell

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mp4j::bootstrap::{self, Bootstrap, Shell};
use mp4j::resource::{self, AppPaths};
use mp4j::theme::ThemeDescriptor;

#[derive(Parser)]
#[command(name = "mp4j")]
#[command(about = "Bootstrap and launcher for the MP4J music player")]
struct Args {
    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,

    /// Override the application data root
    #[arg(long)]
    root: Option<PathBuf>,

    /// Dump the resolved settings as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn init_logging(paths: &AppPaths, dev: bool) -> Result<()> {
    // The log directory has to exist before ensure_directories runs
    let log_dir = paths.logs_dir();
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&log_dir, "mp4j.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let base_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mp4j=debug"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if dev {
        eprintln!("Dev mode: debug output enabled, logs in {}", log_dir.display());
    }

    // Keep the appender guard alive for the life of the process
    std::mem::forget(guard);

    Ok(())
}

/// Console stand-in for the desktop shell. The real component tree is an
/// external collaborator; this implementation keeps the hand-off observable.
struct ConsoleShell {
    dev: bool,
}

impl Shell for ConsoleShell {
    fn apply_theme(&mut self, theme: &ThemeDescriptor) {
        info!(theme = theme.display_name, "theme applied");
        if self.dev {
            eprintln!("theme: {} ({:?})", theme.display_name, theme.flavor);
        }
    }

    fn splash(&mut self, duration: Duration) {
        println!("MP4J - Music Player");
        println!("===================");
        thread::sleep(duration);
    }

    fn welcome(&mut self, previous_session: &str) {
        println!("Welcome back. Last session directory: {previous_session}");
    }

    fn run(&mut self) -> Result<()> {
        // The desktop shell takes over here; nothing left to do in console mode
        info!("hand-off to shell complete");
        Ok(())
    }
}

fn run(paths: &AppPaths, args: &Args) -> Result<()> {
    let launch = Bootstrap::new(paths.clone()).run()?;

    if args.print_config {
        println!("{}", launch.settings.to_toml()?);
        return Ok(());
    }

    let mut shell = ConsoleShell { dev: args.dev };
    bootstrap::launch_ui(&launch, &mut shell)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = AppPaths::new(resource::resolve_root(args.root.clone()));
    init_logging(&paths, args.dev)?;

    info!(root = %paths.root().display(), "MP4J starting up");
    let started = Instant::now();

    // One outermost handler: log, write the dated crash entry, keep going
    // to report elapsed time. No dialog is shown; this is developer-facing.
    if let Err(e) = run(&paths, &args) {
        error!(error = %format!("{e:#}"), "startup failed");
        match paths.write_log("exception", &format!("{e:?}")) {
            Ok(entry) => error!(log = %entry.display(), "crash log written"),
            Err(log_err) => error!(error = %log_err, "could not write crash log"),
        }
    }

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "startup tasks finished"
    );
    Ok(())
}
