use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Initialise logging. With `debug` enabled the default level is `debug` and
/// `RUST_LOG` may override it; otherwise the level is fixed at `info`.
/// When `log_file` is set, output is appended to that file instead of stderr.
/// Only the first successful call installs a subscriber.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    // Without debug logging `RUST_LOG` is ignored so a stray variable in the
    // user's environment cannot turn on verbose output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    match log_file.as_deref().and_then(split_log_path) {
        Some((dir, file_name)) => {
            let appender = tracing_appender::rolling::never(dir, file_name);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(appender)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    }
}

fn split_log_path(path: &Path) -> Option<(PathBuf, PathBuf)> {
    let file_name = PathBuf::from(path.file_name()?);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, file_name))
}
