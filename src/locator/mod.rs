//! Locators for the files the game client leaves on disk.
//!
//! - `credentials`: the Riot client lock file (local API port + password)
//! - `routing`: the game log (region and shard of the remote servers)
//!
//! Neither retries. A missing file is reported as `NotFound` and the caller
//! decides whether to poll.

mod credentials;
mod routing;

pub use credentials::{locate_credentials, parse_lockfile};
pub use routing::{locate_routing, parse_routing};

use std::path::Path;
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use crate::error::LocateError;

/// Read a file that is expected to exist, bounded by `limit`.
///
/// Missing files map to `NotFound`. Bytes that aren't valid UTF-8 are
/// replaced rather than rejected; the game log is not guaranteed clean.
async fn read_existing(path: &Path, limit: Duration) -> Result<String, LocateError> {
    let exists = timeout(limit, tokio::fs::try_exists(path))
        .await
        .map_err(|_| LocateError::Timeout(path.to_path_buf()))?
        .map_err(|source| LocateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    if !exists {
        debug!("{} does not exist", path.display());
        return Err(LocateError::NotFound(path.to_path_buf()));
    }

    let bytes = timeout(limit, tokio::fs::read(path))
        .await
        .map_err(|_| LocateError::Timeout(path.to_path_buf()))?
        .map_err(|source| match source.kind() {
            // Removed between the existence check and the read.
            std::io::ErrorKind::NotFound => LocateError::NotFound(path.to_path_buf()),
            _ => LocateError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
