use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use super::read_existing;
use crate::domain::ApiInfo;
use crate::error::LocateError;

const LOCKFILE_FIELDS: usize = 5;

/// Read and parse the lock file at `path`.
pub async fn locate_credentials(path: &Path, limit: Duration) -> Result<ApiInfo, LocateError> {
    let content = read_existing(path, limit).await?;
    let info = parse_lockfile(&content)?;
    info!(
        "Found local client credentials (pid {}, port {})",
        info.process_id, info.port
    );
    Ok(info)
}

/// Parse `username:pid:port:password:protocol`.
pub fn parse_lockfile(content: &str) -> Result<ApiInfo, LocateError> {
    let line = content.trim();
    let fields: Vec<&str> = line.split(':').collect();

    if fields.len() != LOCKFILE_FIELDS {
        debug!("Lock file has {} fields", fields.len());
        return Err(LocateError::MalformedCredentials(format!(
            "expected {} colon-separated fields, found {}",
            LOCKFILE_FIELDS,
            fields.len()
        )));
    }

    let process_id = fields[1].parse::<u32>().map_err(|e| {
        LocateError::MalformedCredentials(format!("invalid process id '{}': {}", fields[1], e))
    })?;
    let port = fields[2].parse::<u16>().map_err(|e| {
        LocateError::MalformedCredentials(format!("invalid port '{}': {}", fields[2], e))
    })?;

    Ok(ApiInfo {
        username: fields[0].to_string(),
        process_id,
        port,
        password: fields[3].to_string(),
        protocol: fields[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_lockfile() {
        let info = parse_lockfile("Riot Client:12345:54321:s3cr3t-pass:https").unwrap();
        assert_eq!(info.username, "Riot Client");
        assert_eq!(info.process_id, 12345);
        assert_eq!(info.port, 54321);
        assert_eq!(info.password, "s3cr3t-pass");
        assert_eq!(info.protocol, "https");
    }

    #[test]
    fn test_parse_lockfile_trims_trailing_newline() {
        let info = parse_lockfile("Riot Client:1:2:pw:http\r\n").unwrap();
        assert_eq!(info.protocol, "http");
    }

    #[test]
    fn test_parse_lockfile_wrong_field_count() {
        for content in ["", "a:1:2:pw", "a:1:2:pw:https:extra"] {
            let err = parse_lockfile(content).unwrap_err();
            assert!(
                matches!(err, LocateError::MalformedCredentials(_)),
                "{content:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_lockfile_non_numeric() {
        assert!(matches!(
            parse_lockfile("a:pid:2:pw:https"),
            Err(LocateError::MalformedCredentials(_))
        ));
        assert!(matches!(
            parse_lockfile("a:1:99999:pw:https"),
            Err(LocateError::MalformedCredentials(_))
        ));
    }

    #[tokio::test]
    async fn test_locate_credentials_missing_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("lockfile");

        let err = locate_credentials(&path, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LocateError::NotFound(p) if p == path));
    }

    #[tokio::test]
    async fn test_locate_credentials_reads_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("lockfile");
        fs::write(&path, "Riot Client:4242:61000:abc:https").unwrap();

        let info = locate_credentials(&path, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(info.process_id, 4242);
        assert_eq!(info.port, 61000);
        assert_eq!(info.password, "abc");
    }
}
