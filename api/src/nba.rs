//! data.nba.net raw wire types: serde shapes for the documents we consume.
//! These map to our clean domain types in extract.rs.
//!
//! The feed is loose about types: ids, counts and percentages usually arrive
//! as strings ("1610612744", "12", "0.467") but occasionally as JSON numbers,
//! so every numeric field goes through `flexible`.

use crate::{PersonId, TeamId};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

fn parse_value<T, E>(value: Value) -> Result<Option<T>, E>
where
    T: FromStr,
    T::Err: Display,
    E: de::Error,
{
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(E::custom(format!("expected a scalar, got {other}"))),
    };
    text.parse::<T>()
        .map(Some)
        .map_err(|e| E::custom(format!("{text:?}: {e}")))
}

/// A required scalar that may be encoded as a string or a JSON number/bool.
pub(crate) fn flexible<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    parse_value::<T, D::Error>(Value::deserialize(deserializer)?)?
        .ok_or_else(|| de::Error::custom("missing value"))
}

/// Like `flexible`, but null and empty strings become `None`.
pub(crate) fn flexible_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    parse_value::<T, D::Error>(Value::deserialize(deserializer)?)
}

impl<'de> Deserialize<'de> for TeamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        flexible(deserializer).map(TeamId)
    }
}

impl<'de> Deserialize<'de> for PersonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        flexible(deserializer).map(PersonId)
    }
}

// ---------------------------------------------------------------------------
// Bootstrap  (today.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Bootstrap {
    #[serde(default)]
    pub anchor_date: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt")]
    pub season_schedule_year: Option<u32>,
    #[serde(default)]
    pub links: HashMap<String, Value>,
}

impl Bootstrap {
    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(name).and_then(Value::as_str)
    }

    /// Some revisions of today.json put `anchorDate` at the top level, newer
    /// ones inside `links`.
    pub fn anchor_date(&self) -> Option<&str> {
        self.anchor_date.as_deref().or_else(|| self.link("anchorDate"))
    }
}

// ---------------------------------------------------------------------------
// Today's scoreboard
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    #[serde(default)]
    pub games: Vec<ScoreboardGame>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardGame {
    pub game_id: String,
    pub start_date_eastern: String, // "20161030"
    #[serde(deserialize_with = "flexible")]
    pub status_num: u8, // 1 scheduled, 2 live, 3 final
    pub period: Period,
    pub h_team: GameTeam,
    pub v_team: GameTeam,
    #[serde(default)]
    pub nugget: Option<Nugget>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Period {
    #[serde(deserialize_with = "flexible")]
    pub current: u8,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameTeam {
    pub team_id: TeamId,
    pub tri_code: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Nugget {
    #[serde(default)]
    pub text: String,
}

// ---------------------------------------------------------------------------
// `{"league": {"standard": ...}}` documents
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct LeagueResponse<T> {
    pub league: StandardLeague<T>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StandardLeague<T> {
    pub standard: T,
}

impl<T> LeagueResponse<T> {
    pub fn into_standard(self) -> T {
        self.league.standard
    }
}

pub type PlayersResponse = LeagueResponse<Vec<RosterPlayer>>;
pub type TeamsResponse = LeagueResponse<Vec<TeamEntry>>;
pub type UngroupedStandingsResponse = LeagueResponse<UngroupedStandings>;
pub type ConferenceStandingsResponse = LeagueResponse<GroupedStandings<Vec<ConferenceStandingTeam>>>;
pub type DivisionStandingsResponse =
    LeagueResponse<GroupedStandings<HashMap<String, Vec<DivisionStandingTeam>>>>;
pub type TeamLeadersResponse = LeagueResponse<TeamLeaders>;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub person_id: PersonId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    pub team_id: TeamId,
    pub tricode: String,
    /// False for all-star and exhibition rosters.
    #[serde(rename = "isNBAFranchise", default, deserialize_with = "flexible")]
    pub is_nba_franchise: bool,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct UngroupedStandings {
    #[serde(default)]
    pub teams: Vec<StandingsTeam>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StandingsTeam {
    pub team_id: TeamId,
    #[serde(deserialize_with = "flexible")]
    pub win: u32,
    #[serde(deserialize_with = "flexible")]
    pub loss: u32,
    #[serde(deserialize_with = "flexible")]
    pub home_win: u32,
    #[serde(deserialize_with = "flexible")]
    pub home_loss: u32,
    #[serde(deserialize_with = "flexible")]
    pub away_win: u32,
    #[serde(deserialize_with = "flexible")]
    pub away_loss: u32,
    #[serde(deserialize_with = "flexible")]
    pub last_ten_win: u32,
    #[serde(deserialize_with = "flexible")]
    pub last_ten_loss: u32,
    #[serde(deserialize_with = "flexible")]
    pub conf_rank: u32,
    #[serde(deserialize_with = "flexible")]
    pub div_rank: u32,
    /// Length of the current streak; direction lives in `is_win_streak`.
    #[serde(deserialize_with = "flexible")]
    pub streak: i32,
    #[serde(default, deserialize_with = "flexible")]
    pub is_win_streak: bool,
    #[serde(deserialize_with = "flexible")]
    pub games_behind: f64,
    #[serde(deserialize_with = "flexible")]
    pub win_pct: f64,
}

/// `{"conference": {"east": ..., "west": ...}}`
#[derive(Debug, Deserialize, Clone)]
pub struct GroupedStandings<T> {
    pub conference: HashMap<String, T>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceStandingTeam {
    pub team_id: TeamId,
    #[serde(deserialize_with = "flexible")]
    pub conf_rank: u32,
    #[serde(deserialize_with = "flexible")]
    pub games_behind: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DivisionStandingTeam {
    pub team_id: TeamId,
    #[serde(deserialize_with = "flexible")]
    pub div_rank: u32,
    #[serde(deserialize_with = "flexible")]
    pub div_games_behind: f64,
}

// ---------------------------------------------------------------------------
// Team leaders  (teams/{teamUrlCode}/leaders.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TeamLeaders {
    pub ppg: Vec<LeaderEntry>,
    pub trpg: Vec<LeaderEntry>,
    pub apg: Vec<LeaderEntry>,
    pub fgp: Vec<LeaderEntry>,
    pub ftp: Vec<LeaderEntry>,
    pub tpp: Vec<LeaderEntry>,
    pub bpg: Vec<LeaderEntry>,
    pub spg: Vec<LeaderEntry>,
    pub tpg: Vec<LeaderEntry>,
    pub pfpg: Vec<LeaderEntry>,
}

impl TeamLeaders {
    pub fn category(&self, category: crate::StatCategory) -> &[LeaderEntry] {
        use crate::StatCategory::*;
        match category {
            Ppg => &self.ppg,
            Trpg => &self.trpg,
            Apg => &self.apg,
            Fgp => &self.fgp,
            Ftp => &self.ftp,
            Tpp => &self.tpp,
            Bpg => &self.bpg,
            Spg => &self.spg,
            Tpg => &self.tpg,
            Pfpg => &self.pfpg,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderEntry {
    pub person_id: PersonId,
    #[serde(deserialize_with = "flexible")]
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Box score  ({gameDate}/{gameId}_boxscore.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreResponse {
    pub basic_game_data: BasicGameData,
    /// Absent until the game tips off.
    #[serde(default)]
    pub stats: Option<BoxScoreStats>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BasicGameData {
    pub game_id: String,
    pub h_team: GameTeam,
    pub v_team: GameTeam,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreStats {
    pub h_team: BoxScoreTeamStats,
    pub v_team: BoxScoreTeamStats,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoxScoreTeamStats {
    pub leaders: BoxScoreLeaders,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoxScoreLeaders {
    pub points: LeaderGroup,
    pub rebounds: LeaderGroup,
    pub assists: LeaderGroup,
}

impl BoxScoreLeaders {
    pub fn category(&self, category: crate::GameStatCategory) -> &LeaderGroup {
        match category {
            crate::GameStatCategory::Points => &self.points,
            crate::GameStatCategory::Rebounds => &self.rebounds,
            crate::GameStatCategory::Assists => &self.assists,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeaderGroup {
    #[serde(default, deserialize_with = "flexible_opt")]
    pub value: Option<u32>,
    #[serde(default)]
    pub players: Vec<LeaderPlayer>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderPlayer {
    pub person_id: PersonId,
}

// ---------------------------------------------------------------------------
// Playoffs bracket  (playoffsBracket.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlayoffsBracketResponse {
    #[serde(default)]
    pub series: Vec<PlayoffSeries>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffSeries {
    #[serde(deserialize_with = "flexible")]
    pub round_num: u8,
    #[serde(default)]
    pub conf_name: String,
    #[serde(default)]
    pub series_id: String,
    /// Set once both slots of the series are known.
    #[serde(default, deserialize_with = "flexible")]
    pub is_schedule_available: bool,
    #[serde(default, deserialize_with = "flexible")]
    pub is_series_completed: bool,
    pub top_row: SeriesRow,
    pub bottom_row: SeriesRow,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRow {
    /// Empty while the slot is undetermined.
    #[serde(default, deserialize_with = "flexible_opt")]
    pub team_id: Option<u64>,
    #[serde(default, deserialize_with = "flexible_opt")]
    pub seed_num: Option<u8>,
    #[serde(default, deserialize_with = "flexible_opt")]
    pub wins: Option<u8>,
    #[serde(default, deserialize_with = "flexible")]
    pub is_series_winner: bool,
}
