//! Tracing setup for the binary: stderr always, plus an optional log file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "valtrack.log";

/// Open `<dir>/valtrack.log` for appending, creating the directory if needed.
pub fn open_log_file(dir: &Path) -> io::Result<(PathBuf, File)> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// Install the global subscriber. `debug` when verbose, `info` otherwise.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> io::Result<Option<PathBuf>> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let (path, file_layer) = match log_dir {
        Some(dir) => {
            let (path, file) = open_log_file(dir)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(path), Some(layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("nested").join("logs");

        let (path, _file) = open_log_file(&logs).unwrap();
        assert_eq!(path, logs.join(LOG_FILE_NAME));
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = TempDir::new().unwrap();

        let (path, mut file) = open_log_file(dir.path()).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);

        let (_, mut file) = open_log_file(dir.path()).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        assert_eq!(std::fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }
}
