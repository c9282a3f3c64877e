// Bootstrap orchestrator - the fixed sequence that prepares filesystem
// state and configuration, then hands the process to the UI shell.
//
// The sequence is an explicit ordered step list with a per-step failure
// policy decided here, in one place, instead of being buried in call sites.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{ConfigError, Settings};
use crate::net;
use crate::resource::{AppPaths, ResourceError};
use crate::session;
use crate::theme::{Theme, ThemeDescriptor};

/// How long the splash screen stays up. Timed, non-interactive.
pub const SPLASH_DURATION: Duration = Duration::from_millis(1400);

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// What the orchestrator does when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Log the error, fall back to defaults, keep going.
    ContinueOnError,
    /// Propagate; startup cannot proceed without this step.
    Fatal,
}

#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub policy: StepPolicy,
}

/// The startup sequence, in the order it runs. Reordering a row reorders
/// the run; there is no other sequencing anywhere.
pub const STEPS: &[Step] = &[
    Step { name: "load-properties", policy: StepPolicy::ContinueOnError },
    Step { name: "select-theme", policy: StepPolicy::ContinueOnError },
    Step { name: "ensure-directories", policy: StepPolicy::Fatal },
    Step { name: "connectivity-probe", policy: StepPolicy::Fatal },
    Step { name: "read-session-marker", policy: StepPolicy::ContinueOnError },
];

/// Per-step record kept for the launch summary.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub name: &'static str,
    pub error: Option<String>,
}

impl StepOutcome {
    fn ok(name: &'static str) -> Self {
        Self { name, error: None }
    }

    fn recovered(name: &'static str, err: &BootstrapError) -> Self {
        Self {
            name,
            error: Some(err.to_string()),
        }
    }
}

/// Everything the UI hand-off needs, produced by a completed bootstrap.
#[derive(Debug)]
pub struct Launch {
    pub settings: Settings,
    pub theme: &'static ThemeDescriptor,
    pub online: bool,
    pub previous_session: String,
    pub steps: Vec<StepOutcome>,
    pub elapsed: Duration,
}

/// The seam to the UI layer. The real desktop shell lives elsewhere; the
/// binary ships a console implementation.
pub trait Shell {
    fn apply_theme(&mut self, theme: &ThemeDescriptor);
    fn splash(&mut self, duration: Duration);
    fn welcome(&mut self, previous_session: &str);
    fn run(&mut self) -> anyhow::Result<()>;
}

pub struct Bootstrap {
    paths: AppPaths,
    probe_target: Option<(String, u16, Duration)>,
}

// Scratch state threaded through the step list.
#[derive(Default)]
struct Progress {
    settings: Option<Settings>,
    theme: Option<&'static ThemeDescriptor>,
    online: Option<bool>,
    previous_session: Option<String>,
}

impl Bootstrap {
    pub fn new(paths: AppPaths) -> Self {
        Self {
            paths,
            probe_target: None,
        }
    }

    /// Overrides the probe target, bypassing the `net.ping*` properties.
    pub fn with_probe_target(mut self, host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        self.probe_target = Some((host.into(), port, timeout));
        self
    }

    /// Runs the step list in order. Recoverable failures are logged and
    /// recorded; fatal ones propagate to the top-level handler.
    pub fn run(&self) -> Result<Launch, BootstrapError> {
        let start = Instant::now();
        let mut progress = Progress::default();
        let mut outcomes = Vec::with_capacity(STEPS.len());

        for step in STEPS {
            match self.run_step(step.name, &mut progress) {
                Ok(()) => outcomes.push(StepOutcome::ok(step.name)),
                Err(e) => match step.policy {
                    StepPolicy::Fatal => {
                        error!(step = step.name, error = %e, "fatal bootstrap step failed");
                        return Err(e);
                    }
                    StepPolicy::ContinueOnError => {
                        warn!(step = step.name, error = %e, "bootstrap step failed, continuing with defaults");
                        outcomes.push(StepOutcome::recovered(step.name, &e));
                    }
                },
            }
        }

        let launch = Launch {
            settings: progress.settings.unwrap_or_default(),
            theme: progress.theme.unwrap_or_else(|| Theme::select("").descriptor()),
            online: progress.online.unwrap_or(false),
            previous_session: progress
                .previous_session
                .unwrap_or_else(|| session::SESSION_SENTINEL.to_string()),
            steps: outcomes,
            elapsed: start.elapsed(),
        };

        info!(
            theme = launch.theme.display_name,
            online = launch.online,
            elapsed_ms = launch.elapsed.as_millis() as u64,
            "bootstrap complete"
        );
        Ok(launch)
    }

    fn run_step(&self, name: &str, progress: &mut Progress) -> Result<(), BootstrapError> {
        match name {
            "load-properties" => {
                let settings = Settings::load(&self.paths.properties_file())?;
                progress.settings = Some(settings);
                Ok(())
            }
            "select-theme" => {
                let key = progress
                    .settings
                    .as_ref()
                    .map(Settings::theme_key)
                    .unwrap_or("dark");
                let descriptor = Theme::select(key).descriptor();
                info!(requested = key, selected = descriptor.display_name, "theme selected");
                progress.theme = Some(descriptor);
                Ok(())
            }
            "ensure-directories" => {
                let created = self.paths.ensure_directories()?;
                info!(created, root = %self.paths.root().display(), "resource directories verified");
                Ok(())
            }
            "connectivity-probe" => {
                let (host, port, timeout) = self.resolve_probe_target(progress.settings.as_ref());
                let online = net::probe(&host, port, timeout);
                // The probe result never gates launch, but a flag the UI
                // cannot read later is a hard failure.
                net::write_flag(&self.paths.flag_file(), online)?;
                progress.online = Some(online);
                Ok(())
            }
            "read-session-marker" => {
                progress.previous_session = Some(session::read_info(&self.paths));
                Ok(())
            }
            other => {
                warn!(step = other, "unknown bootstrap step skipped");
                Ok(())
            }
        }
    }

    fn resolve_probe_target(&self, settings: Option<&Settings>) -> (String, u16, Duration) {
        if let Some((host, port, timeout)) = &self.probe_target {
            return (host.clone(), *port, *timeout);
        }

        let host = settings
            .and_then(|s| s.get_prop("net.pingHost"))
            .unwrap_or(net::DEFAULT_PROBE_HOST)
            .to_string();
        let port = settings
            .and_then(|s| s.get_prop("net.pingPort"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(net::DEFAULT_PROBE_PORT);
        let timeout = settings
            .and_then(|s| s.get_prop("net.pingTimeoutMs"))
            .and_then(|t| t.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(net::DEFAULT_PROBE_TIMEOUT);

        (host, port, timeout)
    }
}

/// Drives the UI seam with a finished launch: theme, splash, welcome, run.
pub fn launch_ui(launch: &Launch, shell: &mut dyn Shell) -> anyhow::Result<()> {
    shell.apply_theme(launch.theme);
    shell.splash(SPLASH_DURATION);
    shell.welcome(&launch.previous_session);
    shell.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use tempfile::tempdir;

    // A local port that was bound and released, so connecting fails fast.
    fn closed_target() -> (String, u16, Duration) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        ("127.0.0.1".to_string(), port, Duration::from_millis(200))
    }

    fn bootstrap_at(root: &std::path::Path) -> Bootstrap {
        let (host, port, timeout) = closed_target();
        Bootstrap::new(AppPaths::new(root)).with_probe_target(host, port, timeout)
    }

    #[test]
    fn test_full_run_prepares_everything() {
        let tmp = tempdir().unwrap();
        let paths = AppPaths::new(tmp.path().join("MP4J"));
        let launch = bootstrap_at(&tmp.path().join("MP4J")).run().unwrap();

        assert!(paths.cache_dir().is_dir());
        assert!(paths.logs_dir().is_dir());
        assert!(paths.properties_file().is_file());
        // Offline probe target: flag persisted as "0"
        assert_eq!(std::fs::read_to_string(paths.flag_file()).unwrap(), "0");
        assert!(!launch.online);
        assert_eq!(launch.previous_session, session::SESSION_SENTINEL);
        assert_eq!(launch.steps.len(), STEPS.len());
        assert!(launch.steps.iter().all(|s| s.error.is_none()));
    }

    #[test]
    fn test_corrupt_properties_falls_back_and_continues() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("MP4J");
        let paths = AppPaths::new(&root);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(paths.properties_file(), "not a property line at all\n").unwrap();

        let launch = bootstrap_at(&root).run().unwrap();

        // Theme fell back to the default and execution proceeded to the
        // directory checks and beyond
        assert_eq!(launch.theme.config_key, "dark");
        assert!(paths.cache_dir().is_dir());
        assert!(paths.flag_file().is_file());

        let props_step = launch
            .steps
            .iter()
            .find(|s| s.name == "load-properties")
            .unwrap();
        assert!(props_step.error.is_some());
    }

    #[test]
    fn test_probe_success_writes_one() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("MP4J");
        let paths = AppPaths::new(&root);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let launch = Bootstrap::new(AppPaths::new(&root))
            .with_probe_target("127.0.0.1", port, Duration::from_millis(500))
            .run()
            .unwrap();

        assert!(launch.online);
        assert_eq!(std::fs::read_to_string(paths.flag_file()).unwrap(), "1");
    }

    #[test]
    fn test_rerun_overwrites_flag() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("MP4J");
        let paths = AppPaths::new(&root);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        Bootstrap::new(AppPaths::new(&root))
            .with_probe_target("127.0.0.1", port, Duration::from_millis(500))
            .run()
            .unwrap();
        assert_eq!(std::fs::read_to_string(paths.flag_file()).unwrap(), "1");

        bootstrap_at(&root).run().unwrap();
        assert_eq!(std::fs::read_to_string(paths.flag_file()).unwrap(), "0");
    }

    #[test]
    fn test_session_marker_forwarded_to_launch() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("MP4J");
        let paths = AppPaths::new(&root);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(paths.prev_session_file(), "/home/user/music").unwrap();

        let launch = bootstrap_at(&root).run().unwrap();
        assert_eq!(launch.previous_session, "/home/user/music");
    }

    #[test]
    fn test_shell_sees_theme_splash_welcome_run_in_order() {
        #[derive(Default)]
        struct Recorder {
            calls: Vec<String>,
        }
        impl Shell for Recorder {
            fn apply_theme(&mut self, theme: &ThemeDescriptor) {
                self.calls.push(format!("theme:{}", theme.config_key));
            }
            fn splash(&mut self, duration: Duration) {
                self.calls.push(format!("splash:{}", duration.as_millis()));
            }
            fn welcome(&mut self, previous_session: &str) {
                self.calls.push(format!("welcome:{previous_session}"));
            }
            fn run(&mut self) -> anyhow::Result<()> {
                self.calls.push("run".to_string());
                Ok(())
            }
        }

        let tmp = tempdir().unwrap();
        let launch = bootstrap_at(&tmp.path().join("MP4J")).run().unwrap();
        let mut shell = Recorder::default();
        launch_ui(&launch, &mut shell).unwrap();

        assert_eq!(
            shell.calls,
            vec![
                "theme:dark".to_string(),
                "splash:1400".to_string(),
                "welcome:.".to_string(),
                "run".to_string(),
            ]
        );
    }

    #[test]
    fn test_probe_target_parsed_from_properties() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("MP4J");
        let paths = AppPaths::new(&root);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            paths.properties_file(),
            "net.pingHost=localhost\nnet.pingPort=6600\nnet.pingTimeoutMs=250\n",
        )
        .unwrap();

        let bootstrap = Bootstrap::new(paths.clone());
        let settings = Settings::load(&paths.properties_file()).unwrap();
        let (host, port, timeout) = bootstrap.resolve_probe_target(Some(&settings));
        assert_eq!(host, "localhost");
        assert_eq!(port, 6600);
        assert_eq!(timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_garbage_probe_settings_use_defaults() {
        let mut settings = Settings::default();
        settings.set_prop("net.pingPort", "not-a-port");
        settings.set_prop("net.pingTimeoutMs", "forever");

        let tmp = tempdir().unwrap();
        let bootstrap = Bootstrap::new(AppPaths::new(tmp.path()));
        let (_, port, timeout) = bootstrap.resolve_probe_target(Some(&settings));
        assert_eq!(port, net::DEFAULT_PROBE_PORT);
        assert_eq!(timeout, net::DEFAULT_PROBE_TIMEOUT);
    }
}
