//! Response shapes for the local and remote APIs.
//!
//! Only the fields the companion UI reads are modelled; unknown fields are
//! ignored. Identifiers that are UUIDs on the wire are decoded as [`Uuid`] so
//! a malformed payload fails at decode time instead of deep in the UI.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ============================================================================
// Local API
// ============================================================================

/// `entitlements/v1/token`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementsToken {
    /// Bearer token for remote requests
    pub access_token: String,
    #[serde(default)]
    pub entitlements: Vec<serde_json::Value>,
    #[serde(default)]
    pub issuer: String,
    pub subject: Uuid,
    /// Entitlements JWT for remote requests
    pub token: String,
}

/// `chat/v1/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub puuid: Uuid,
    #[serde(default)]
    pub federated: bool,
    #[serde(default, rename = "game_name")]
    pub game_name: String,
    #[serde(default, rename = "game_tag")]
    pub game_tag: String,
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pid: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub state: String,
}

impl ChatSession {
    /// `Name#TAG`
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.game_tag)
    }
}

/// Launch arguments of an external product session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfiguration {
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub executable: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub voice_locale: Option<String>,
    #[serde(default)]
    pub working_directory: String,
}

/// One entry of `product-session/v1/external-sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSession {
    pub product_id: String,
    /// Empty when the client omits it; only the target product's entry must
    /// carry one.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub exit_code: i32,
    #[serde(default)]
    pub exit_reason: Option<String>,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub launch_configuration: LaunchConfiguration,
    #[serde(default)]
    pub patchline_full_name: String,
    #[serde(default)]
    pub patchline_id: String,
    #[serde(default)]
    pub phase: String,
}

/// `product-session/v1/external-sessions`: session id to session, in the
/// order the client returned them.
#[derive(Debug, Clone, Default)]
pub struct ExternalSessions(pub Vec<(String, ExternalSession)>);

impl ExternalSessions {
    /// First session for `product_id`, in source order.
    pub fn find_product(&self, product_id: &str) -> Option<&ExternalSession> {
        self.0
            .iter()
            .map(|(_, session)| session)
            .find(|session| session.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for ExternalSessions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SessionsVisitor;

        impl<'de> Visitor<'de> for SessionsVisitor {
            type Value = ExternalSessions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of session id to external session")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sessions = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, session)) = map.next_entry::<String, ExternalSession>()? {
                    sessions.push((id, session));
                }
                Ok(ExternalSessions(sessions))
            }
        }

        deserializer.deserialize_map(SessionsVisitor)
    }
}

impl Serialize for ExternalSessions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(id, session)| (id, session)))
    }
}

// ============================================================================
// Remote API: live game (glz)
// ============================================================================

/// `core-game/v1/players/{puuid}` and `pregame/v1/players/{puuid}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerMatchRef {
    pub subject: Uuid,
    #[serde(rename = "MatchID")]
    pub match_id: Uuid,
    #[serde(default)]
    pub version: u64,
}

/// Public identity block embedded in live-game payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerIdentity {
    pub subject: Uuid,
    #[serde(default, rename = "PlayerCardID")]
    pub player_card_id: String,
    #[serde(default, rename = "PlayerTitleID")]
    pub player_title_id: String,
    #[serde(default)]
    pub account_level: u32,
    #[serde(default, rename = "PreferredLevelBorderID")]
    pub preferred_level_border_id: String,
    #[serde(default)]
    pub incognito: bool,
    #[serde(default)]
    pub hide_account_level: bool,
}

/// Player entry of `core-game/v1/matches/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoreGamePlayer {
    pub subject: Uuid,
    #[serde(rename = "TeamID")]
    pub team_id: String,
    #[serde(default, rename = "CharacterID")]
    pub character_id: String,
    #[serde(default)]
    pub player_identity: Option<PlayerIdentity>,
    #[serde(default)]
    pub is_coach: bool,
    #[serde(default)]
    pub is_associated: bool,
}

/// `core-game/v1/matches/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoreGameMatch {
    #[serde(rename = "MatchID")]
    pub match_id: Uuid,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub state: String,
    #[serde(default, rename = "MapID")]
    pub map_id: String,
    #[serde(default, rename = "ModeID")]
    pub mode_id: String,
    #[serde(default)]
    pub provisioning_flow: String,
    #[serde(default, rename = "GamePodID")]
    pub game_pod_id: String,
    #[serde(default)]
    pub is_reconnectable: bool,
    #[serde(default)]
    pub players: Vec<CoreGamePlayer>,
    #[serde(default)]
    pub matchmaking_data: Option<serde_json::Value>,
}

/// Player entry in a pregame team
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PregamePlayer {
    pub subject: Uuid,
    #[serde(default, rename = "CharacterID")]
    pub character_id: String,
    #[serde(default)]
    pub character_selection_state: String,
    #[serde(default)]
    pub pregame_player_state: String,
    #[serde(default)]
    pub competitive_tier: u32,
    #[serde(default)]
    pub player_identity: Option<PlayerIdentity>,
    #[serde(default)]
    pub is_captain: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PregameTeam {
    #[serde(rename = "TeamID")]
    pub team_id: String,
    #[serde(default)]
    pub players: Vec<PregamePlayer>,
}

/// `pregame/v1/matches/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PregameMatch {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub teams: Vec<PregameTeam>,
    #[serde(default)]
    pub ally_team: Option<PregameTeam>,
    #[serde(default)]
    pub enemy_team_size: u32,
    #[serde(default)]
    pub enemy_team_lock_count: u32,
    #[serde(default)]
    pub pregame_state: String,
    #[serde(default, rename = "MapID")]
    pub map_id: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default, rename = "QueueID")]
    pub queue_id: String,
    #[serde(default)]
    pub is_ranked: bool,
    #[serde(default, rename = "PhaseTimeRemainingNS")]
    pub phase_time_remaining_ns: i64,
}

// ============================================================================
// Remote API: player data (pd)
// ============================================================================

/// One row of a player's match history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchHistoryEntry {
    #[serde(rename = "MatchID")]
    pub match_id: Uuid,
    /// Milliseconds since the Unix epoch
    pub game_start_time: i64,
    #[serde(default, rename = "QueueID")]
    pub queue_id: String,
}

impl MatchHistoryEntry {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.game_start_time)
    }
}

/// `match-history/v1/history/{puuid}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchHistory {
    pub subject: Uuid,
    pub begin_index: u32,
    pub end_index: u32,
    pub total: u32,
    #[serde(default)]
    pub history: Vec<MatchHistoryEntry>,
}

/// `matchInfo` block of match details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub match_id: Uuid,
    #[serde(default)]
    pub map_id: String,
    #[serde(default)]
    pub game_pod_id: String,
    #[serde(default)]
    pub game_version: String,
    #[serde(default)]
    pub game_length_millis: Option<u64>,
    #[serde(default)]
    pub game_start_millis: i64,
    #[serde(default, rename = "provisioningFlowID")]
    pub provisioning_flow_id: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, rename = "queueID")]
    pub queue_id: String,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub is_ranked: bool,
    #[serde(default)]
    pub season_id: String,
    #[serde(default)]
    pub completion_state: String,
}

impl MatchInfo {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.game_start_millis)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub rounds_played: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub playtime_millis: u64,
}

impl PlayerStats {
    /// Kills per death; a deathless game counts deaths as one.
    pub fn kd_ratio(&self) -> f64 {
        f64::from(self.kills) / f64::from(self.deaths.max(1))
    }

    /// Average combat score per round.
    pub fn average_combat_score(&self) -> Option<f64> {
        (self.rounds_played > 0).then(|| f64::from(self.score) / f64::from(self.rounds_played))
    }
}

/// Player entry of match details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayer {
    pub subject: Uuid,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub tag_line: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub party_id: String,
    #[serde(default)]
    pub character_id: String,
    #[serde(default)]
    pub stats: Option<PlayerStats>,
    #[serde(default)]
    pub competitive_tier: u32,
    #[serde(default)]
    pub is_observer: bool,
    #[serde(default)]
    pub player_card: String,
    #[serde(default)]
    pub player_title: String,
    #[serde(default)]
    pub account_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTeam {
    pub team_id: String,
    pub won: bool,
    #[serde(default)]
    pub rounds_played: u32,
    #[serde(default)]
    pub rounds_won: u32,
    #[serde(default)]
    pub num_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub subject: Uuid,
    pub team_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Economy {
    #[serde(default)]
    pub loadout_value: u32,
    #[serde(default)]
    pub weapon: String,
    #[serde(default)]
    pub armor: String,
    #[serde(default)]
    pub remaining: u32,
    #[serde(default)]
    pub spent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Damage {
    pub receiver: Uuid,
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub legshots: u32,
    #[serde(default)]
    pub bodyshots: u32,
    #[serde(default)]
    pub headshots: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishingDamage {
    #[serde(default)]
    pub damage_type: String,
    #[serde(default)]
    pub damage_item: String,
    #[serde(default)]
    pub is_secondary_fire_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kill {
    #[serde(default)]
    pub game_time: u64,
    #[serde(default)]
    pub round_time: u64,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub killer: Option<Uuid>,
    pub victim: Uuid,
    #[serde(default)]
    pub assistants: Vec<Uuid>,
    #[serde(default)]
    pub finishing_damage: FinishingDamage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPlayerStats {
    pub subject: Uuid,
    #[serde(default)]
    pub kills: Vec<Kill>,
    #[serde(default)]
    pub damage: Vec<Damage>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub economy: Option<Economy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round_num: u32,
    #[serde(default)]
    pub round_result: String,
    #[serde(default)]
    pub round_ceremony: String,
    #[serde(default)]
    pub winning_team: String,
    #[serde(default)]
    pub bomb_planter: Option<Uuid>,
    #[serde(default)]
    pub bomb_defuser: Option<Uuid>,
    #[serde(default)]
    pub plant_round_time: Option<u64>,
    #[serde(default)]
    pub defuse_round_time: Option<u64>,
    #[serde(default)]
    pub round_result_code: String,
    #[serde(default)]
    pub player_stats: Vec<RoundPlayerStats>,
}

/// `match-details/v1/matches/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub match_info: MatchInfo,
    #[serde(default)]
    pub players: Vec<MatchPlayer>,
    #[serde(default)]
    pub coaches: Vec<Coach>,
    #[serde(default)]
    pub teams: Option<Vec<MatchTeam>>,
    #[serde(default)]
    pub round_results: Option<Vec<RoundResult>>,
    #[serde(default)]
    pub kills: Option<Vec<Kill>>,
}

impl MatchDetails {
    pub fn player(&self, subject: &Uuid) -> Option<&MatchPlayer> {
        self.players.iter().find(|p| &p.subject == subject)
    }

    pub fn winning_team(&self) -> Option<&MatchTeam> {
        self.teams.as_ref()?.iter().find(|team| team.won)
    }
}
