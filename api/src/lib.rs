pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod extract;
pub mod http;
pub mod ids;
pub mod nba;

pub use client::NbaApi;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, TransportError};

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the data.nba.net wire format
// ---------------------------------------------------------------------------

/// The 30 franchise tricodes the league currently uses.
pub const TEAM_TRICODES: [&str; 30] = [
    "ATL", "BKN", "BOS", "CHA", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND", "LAC",
    "LAL", "MEM", "MIA", "MIL", "MIN", "NOP", "NYK", "OKC", "ORL", "PHI", "PHX", "POR", "SAC",
    "SAS", "TOR", "UTA", "WAS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TeamId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated team tricode ("LAL", "GSW", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Tricode(&'static str);

impl Tricode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Tricode> {
        TEAM_TRICODES.iter().map(|code| Tricode(*code))
    }
}

impl FromStr for Tricode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        TEAM_TRICODES
            .iter()
            .find(|code| **code == wanted)
            .map(|code| Tricode(*code))
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown team tricode {s:?}")))
    }
}

impl fmt::Display for Tricode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String, // empty for single-name players
}

impl PersonName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self { first_name: first_name.into(), last_name: last_name.into() }
    }

    /// "First Last", or just "First" for single-name players.
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// "F. Last", or just "First" for single-name players.
    pub fn short_name(&self) -> String {
        match self.first_name.chars().next() {
            Some(initial) if !self.last_name.is_empty() => {
                format!("{initial}. {}", self.last_name)
            }
            _ if self.first_name.is_empty() => self.last_name.clone(),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub games: u32,
    pub is_winning: bool, // meaningless when games == 0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub total: Record,
    pub home: Record,
    pub away: Record,
    pub last_ten: Record,
    pub conference_rank: u32,
    pub division_rank: u32,
    pub games_behind: f64,
    pub win_percentage: f64,
    pub streak: Streak,
}

/// Season-long per-game categories, in the order leaders are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Ppg,
    Trpg,
    Apg,
    Fgp,
    Ftp,
    Tpp,
    Bpg,
    Spg,
    Tpg,
    Pfpg,
}

impl StatCategory {
    pub const ALL: [StatCategory; 10] = [
        StatCategory::Ppg,
        StatCategory::Trpg,
        StatCategory::Apg,
        StatCategory::Fgp,
        StatCategory::Ftp,
        StatCategory::Tpp,
        StatCategory::Bpg,
        StatCategory::Spg,
        StatCategory::Tpg,
        StatCategory::Pfpg,
    ];

    /// Field name in the team leaders document.
    pub fn key(&self) -> &'static str {
        match self {
            StatCategory::Ppg => "ppg",
            StatCategory::Trpg => "trpg",
            StatCategory::Apg => "apg",
            StatCategory::Fgp => "fgp",
            StatCategory::Ftp => "ftp",
            StatCategory::Tpp => "tpp",
            StatCategory::Bpg => "bpg",
            StatCategory::Spg => "spg",
            StatCategory::Tpg => "tpg",
            StatCategory::Pfpg => "pfpg",
        }
    }

    pub fn label(&self) -> String {
        self.key().to_ascii_uppercase()
    }

    /// Field goal, free throw and three point percentages come as fractions.
    pub fn is_percentage(&self) -> bool {
        matches!(self, StatCategory::Fgp | StatCategory::Ftp | StatCategory::Tpp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatistic {
    pub category: StatCategory,
    pub player: PersonName,
    pub value: f64,
}

/// Box score categories that carry game leaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatCategory {
    Points,
    Rebounds,
    Assists,
}

impl GameStatCategory {
    pub const ALL: [GameStatCategory; 3] =
        [GameStatCategory::Points, GameStatCategory::Rebounds, GameStatCategory::Assists];

    pub fn key(&self) -> &'static str {
        match self {
            GameStatCategory::Points => "points",
            GameStatCategory::Rebounds => "rebounds",
            GameStatCategory::Assists => "assists",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            GameStatCategory::Points => "PTS",
            GameStatCategory::Rebounds => "REB",
            GameStatCategory::Assists => "AST",
        }
    }
}

/// Leader(s) of one category within a single game. Ties keep every co-leader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderStatistic {
    pub category: GameStatCategory,
    pub players: Vec<PersonName>,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamGameLeaders {
    pub team: Tricode,
    pub leaders: Vec<LeaderStatistic>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLeaders {
    pub home: TeamGameLeaders,
    pub away: TeamGameLeaders,
    pub is_final: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::East, Conference::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Conference::East => "east",
            Conference::West => "west",
        }
    }

    pub fn divisions(&self) -> [Division; 3] {
        match self {
            Conference::East => [Division::Atlantic, Division::Central, Division::Southeast],
            Conference::West => [Division::Northwest, Division::Pacific, Division::Southwest],
        }
    }
}

impl FromStr for Conference {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Conference::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown conference {s:?}")))
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    Atlantic,
    Central,
    Southeast,
    Northwest,
    Pacific,
    Southwest,
}

impl Division {
    pub const ALL: [Division; 6] = [
        Division::Atlantic,
        Division::Central,
        Division::Southeast,
        Division::Northwest,
        Division::Pacific,
        Division::Southwest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::Atlantic => "atlantic",
            Division::Central => "central",
            Division::Southeast => "southeast",
            Division::Northwest => "northwest",
            Division::Pacific => "pacific",
            Division::Southwest => "southwest",
        }
    }

    pub fn conference(&self) -> Conference {
        match self {
            Division::Atlantic | Division::Central | Division::Southeast => Conference::East,
            Division::Northwest | Division::Pacific | Division::Southwest => Conference::West,
        }
    }
}

impl FromStr for Division {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Division::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown division {s:?}")))
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingEntry {
    pub team: Tricode,
    pub games_behind: f64,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConferenceStandings {
    pub conference: Conference,
    pub teams: Vec<StandingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionStandings {
    pub conference: Conference,
    pub division: Division,
    pub teams: Vec<StandingEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub id: String,
    pub home_team_id: TeamId,
    pub home_team: String,
    pub away_team_id: TeamId,
    pub away_team: String,
    pub date: NaiveDate,
    pub period: u8,
    pub status: GameStatus,
    pub highlight: String,
}

impl GameSummary {
    /// A game is in progress once its period indicator leaves zero.
    pub fn has_started(&self) -> bool {
        self.period != 0
    }

    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayoffMatchup {
    pub top_seed: u8,
    pub top_team: Tricode,
    pub top_wins: u8,
    pub bottom_seed: u8,
    pub bottom_team: Tricode,
    pub bottom_wins: u8,
    pub is_completed: bool,
    pub top_is_winner: bool,
    pub bottom_is_winner: bool,
    /// Series tied 3-3: the next game decides it.
    pub is_game_seven: bool,
}

impl PlayoffMatchup {
    pub fn winner(&self) -> Option<Tricode> {
        if self.top_is_winner {
            Some(self.top_team)
        } else if self.bottom_is_winner {
            Some(self.bottom_team)
        } else {
            None
        }
    }
}

/// One conference's matchups for a single playoff round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConferenceBracket {
    pub conference: String,
    pub matchups: Vec<PlayoffMatchup>,
}
