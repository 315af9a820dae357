//! Client configuration.
//!
//! Values come from `VALTRACK_*` environment variables, falling back to the
//! locations the Riot client and the game write to on a default install.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;

/// Product id of the game session we bootstrap against
pub const DEFAULT_PRODUCT: &str = "valorant";

/// Canned platform descriptor sent as `X-Riot-ClientPlatform`.
///
/// Base64 of a fixed Windows/PC JSON descriptor. It is not derived from the
/// host; the servers accept this value from every client.
pub const DEFAULT_CLIENT_PLATFORM: &str = "ew0KCSJwbGF0Zm9ybVR5cGUiOiAiUEMiLA0KCSJwbGF0Zm9ybU9TIjogIldpbmRvd3MiLA0KCSJwbGF0Zm9ybU9TVmVyc2lvbiI6ICIxMC4wLjE5MDQyLjEuMjU2LjY0Yml0IiwNCgkicGxhdGZvcm1DaGlwc2V0IjogIlVua25vd24iDQp9";

/// Player-data host. `{shard}` is substituted.
pub const DEFAULT_PD_URL: &str = "https://pd.{shard}.a.pvp.net";

/// Live-game host. `{region}` and `{shard}` are substituted.
pub const DEFAULT_GLZ_URL: &str = "https://glz-{region}-1.{shard}.a.pvp.net";

/// Default request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default timeout for lock file / log file access in seconds
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 5;

/// Default WebSocket handshake timeout in seconds
pub const DEFAULT_SOCKET_TIMEOUT_SECS: u64 = 10;

pub const LOCKFILE_ENV: &str = "VALTRACK_LOCKFILE";
pub const LOGFILE_ENV: &str = "VALTRACK_LOGFILE";
pub const PRODUCT_ENV: &str = "VALTRACK_PRODUCT";
pub const CLIENT_PLATFORM_ENV: &str = "VALTRACK_CLIENT_PLATFORM";
pub const PD_URL_ENV: &str = "VALTRACK_PD_URL";
pub const GLZ_URL_ENV: &str = "VALTRACK_GLZ_URL";
pub const HTTP_TIMEOUT_ENV: &str = "VALTRACK_HTTP_TIMEOUT_SECS";
pub const IO_TIMEOUT_ENV: &str = "VALTRACK_IO_TIMEOUT_SECS";
pub const SOCKET_TIMEOUT_ENV: &str = "VALTRACK_SOCKET_TIMEOUT_SECS";

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub lockfile_path: PathBuf,
    pub log_path: PathBuf,
    pub target_product: String,
    pub client_platform: String,
    pub pd_url: String,
    pub glz_url: String,
    pub http_timeout: Duration,
    pub io_timeout: Duration,
    pub socket_timeout: Duration,
}

impl ClientConfig {
    /// Build a config rooted at explicit file paths, everything else default.
    pub fn with_paths(lockfile_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            lockfile_path: lockfile_path.into(),
            log_path: log_path.into(),
            target_product: DEFAULT_PRODUCT.to_string(),
            client_platform: DEFAULT_CLIENT_PLATFORM.to_string(),
            pd_url: DEFAULT_PD_URL.to_string(),
            glz_url: DEFAULT_GLZ_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            io_timeout: Duration::from_secs(DEFAULT_IO_TIMEOUT_SECS),
            socket_timeout: Duration::from_secs(DEFAULT_SOCKET_TIMEOUT_SECS),
        }
    }

    /// Resolve configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lockfile_path = match std::env::var(LOCKFILE_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_lockfile_path()?,
        };
        let log_path = match std::env::var(LOGFILE_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_log_path()?,
        };

        let mut config = Self::with_paths(lockfile_path, log_path);

        if let Ok(product) = std::env::var(PRODUCT_ENV) {
            config.target_product = product;
        }
        if let Ok(platform) = std::env::var(CLIENT_PLATFORM_ENV) {
            config.client_platform = platform;
        }
        if let Ok(url) = std::env::var(PD_URL_ENV) {
            config.pd_url = url;
        }
        if let Ok(url) = std::env::var(GLZ_URL_ENV) {
            config.glz_url = url;
        }
        if let Some(timeout) = env_secs(HTTP_TIMEOUT_ENV)? {
            config.http_timeout = timeout;
        }
        if let Some(timeout) = env_secs(IO_TIMEOUT_ENV)? {
            config.io_timeout = timeout;
        }
        if let Some(timeout) = env_secs(SOCKET_TIMEOUT_ENV)? {
            config.socket_timeout = timeout;
        }

        debug!("Resolved config: {:?}", config);
        Ok(config)
    }
}

fn env_secs(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => parse_secs(name, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        })
}

fn local_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir().ok_or(ConfigError::NoDataDir)
}

/// Where the Riot client writes its lock file.
pub fn default_lockfile_path() -> Result<PathBuf, ConfigError> {
    Ok(lockfile_under(&local_data_dir()?))
}

/// Where the game writes its session log.
pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    Ok(log_under(&local_data_dir()?))
}

fn lockfile_under(base: &Path) -> PathBuf {
    base.join("Riot Games")
        .join("Riot Client")
        .join("Config")
        .join("lockfile")
}

fn log_under(base: &Path) -> PathBuf {
    base.join("VALORANT")
        .join("Saved")
        .join("Logs")
        .join("ShooterGame.log")
}

/// Substitute `{region}` and `{shard}` in a host template.
pub fn expand_host(template: &str, region: &str, shard: &str) -> String {
    template
        .replace("{region}", region)
        .replace("{shard}", shard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn test_default_paths_layout() {
        let base = Path::new("/data");
        assert!(lockfile_under(base).ends_with("Riot Games/Riot Client/Config/lockfile"));
        assert!(log_under(base).ends_with("VALORANT/Saved/Logs/ShooterGame.log"));
    }

    #[test]
    fn test_expand_host() {
        assert_eq!(
            expand_host(DEFAULT_GLZ_URL, "na", "na"),
            "https://glz-na-1.na.a.pvp.net"
        );
        assert_eq!(
            expand_host(DEFAULT_PD_URL, "latam", "na"),
            "https://pd.na.a.pvp.net"
        );
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("X", "12").unwrap(), Duration::from_secs(12));
        assert_eq!(parse_secs("X", " 3 ").unwrap(), Duration::from_secs(3));
        assert!(parse_secs("X", "0").is_err());
        assert!(parse_secs("X", "soon").is_err());
    }

    #[test]
    fn test_default_client_platform_is_pc_descriptor() {
        let decoded = STANDARD.decode(DEFAULT_CLIENT_PLATFORM).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(value["platformType"], "PC");
        assert_eq!(value["platformOS"], "Windows");
    }

    #[test]
    fn test_with_paths_defaults() {
        let config = ClientConfig::with_paths("/tmp/lockfile", "/tmp/game.log");
        assert_eq!(config.target_product, "valorant");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.lockfile_path, PathBuf::from("/tmp/lockfile"));
    }
}
