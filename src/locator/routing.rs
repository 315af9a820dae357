use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::info;

use super::read_existing;
use crate::domain::RoutingInfo;
use crate::error::LocateError;

fn glz_host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"https://glz-([^\s./]+?)-1\.([^\s./]+)\.a\.pvp\.net")
            .expect("glz host pattern is valid")
    })
}

/// Scan the game log at `path` for the live-game host it connected to.
pub async fn locate_routing(path: &Path, limit: Duration) -> Result<RoutingInfo, LocateError> {
    let content = read_existing(path, limit).await?;
    let routing =
        parse_routing(&content).ok_or_else(|| LocateError::PatternNotFound(path.to_path_buf()))?;
    info!(
        "Resolved routing: region={}, shard={}",
        routing.region, routing.shard
    );
    Ok(routing)
}

/// First `https://glz-{region}-1.{shard}.a.pvp.net` occurrence in `content`.
pub fn parse_routing(content: &str) -> Option<RoutingInfo> {
    let captures = glz_host_pattern().captures(content)?;
    Some(RoutingInfo {
        region: captures[1].to_string(),
        shard: captures[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const LOG_EXCERPT: &str = "\
[2024.01.05-18.02.11:512][  0]LogPlatformInit: Using libcurl 7.83.1
[2024.01.05-18.02.44:017][ 12]LogShooterGameState: Match Started
[2024.01.05-18.02.44:020][ 12]LogPlatformCommon: Platform HTTP Query End. QueryName: [Party_FetchCustomGameConfigs], URL [GET https://glz-na-1.na.a.pvp.net/parties/v1/parties/customgameconfigs], Response Code: [200]
[2024.01.05-18.02.45:100][ 13]LogPlatformCommon: URL [GET https://glz-eu-1.eu.a.pvp.net/parties/v1/players]
";

    #[test]
    fn test_parse_routing_na() {
        let routing = parse_routing(LOG_EXCERPT).unwrap();
        assert_eq!(
            routing,
            RoutingInfo {
                region: "na".to_string(),
                shard: "na".to_string()
            }
        );
    }

    #[test]
    fn test_parse_routing_region_differs_from_shard() {
        let routing = parse_routing("GET https://glz-latam-1.na.a.pvp.net/pregame").unwrap();
        assert_eq!(routing.region, "latam");
        assert_eq!(routing.shard, "na");
    }

    #[test]
    fn test_parse_routing_no_match() {
        assert!(parse_routing("LogInit: nothing here\nhttps://pd.na.a.pvp.net/").is_none());
        assert!(parse_routing("").is_none());
    }

    #[tokio::test]
    async fn test_locate_routing_missing_vs_unmatched() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ShooterGame.log");

        let err = locate_routing(&path, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LocateError::NotFound(_)));

        fs::write(&path, "LogInit: game starting\n").unwrap();
        let err = locate_routing(&path, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LocateError::PatternNotFound(_)));

        fs::write(&path, LOG_EXCERPT).unwrap();
        let routing = locate_routing(&path, Duration::from_secs(1)).await.unwrap();
        assert_eq!(routing.region, "na");
    }
}
