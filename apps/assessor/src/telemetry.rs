//! Logging context for one process run.
//!
//! `Telemetry::init` builds the subscriber (stderr console layer plus an
//! optional append-only file layer) and installs it as the default for the
//! calling thread. The returned value must be held for as long as logging is
//! wanted; dropping it uninstalls the subscriber.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::subscriber::DefaultGuard;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;

pub struct Telemetry {
    log_file: Option<PathBuf>,
    _guard: DefaultGuard,
}

impl Telemetry {
    /// Installs logging for this run. Never fails: if the log file cannot be
    /// opened, file logging is disabled and a warning is emitted on stderr.
    pub fn init(settings: &LogSettings) -> Self {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                settings.level.as_directive()
            ))
        });

        let (file, file_error) = match open_log_file(&settings.file) {
            Ok(file) => (Some(Arc::new(file)), None),
            Err(e) => (None, Some(e)),
        };
        let file_layer = file.map(|file| fmt::layer().with_writer(file).with_ansi(false));

        let guard = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stderr))
            .with(file_layer)
            .set_default();

        if let Some(raw) = &settings.rejected_level {
            warn!("Unknown LOG_LEVEL '{raw}', falling back to INFO");
        }
        if let Some(e) = &file_error {
            warn!(
                "File logging disabled: cannot open {}: {e}",
                settings.file.display()
            );
        }

        Self {
            log_file: file_error.is_none().then(|| settings.file.clone()),
            _guard: guard,
        }
    }

    /// The file receiving log records, if file logging is active.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
