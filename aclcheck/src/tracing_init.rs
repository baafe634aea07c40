use std::fs::OpenOptions;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

/// Environment variable naming a file to append logs to.
pub const LOG_ENV: &str = "ACLCHECK_LOG";

/// Install the global subscriber.
///
/// Logs go to the file named by `ACLCHECK_LOG` when it can be opened, and
/// to stderr otherwise. `verbose` lowers the threshold from WARN to DEBUG.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let log_file = std::env::var_os(LOG_ENV).and_then(|path| {
        let path = std::path::PathBuf::from(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(&path).ok()
    });

    let layer: Box<dyn Layer<_> + Send + Sync> = match log_file {
        Some(file) => tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_filter(LevelFilter::from_level(level))
            .boxed(),
        None => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_filter(LevelFilter::from_level(level))
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).init()
}
