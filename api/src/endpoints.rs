//! Endpoint discovery.
//!
//! data.nba.net does not document its paths. Instead a daily bootstrap
//! document (`today.json`) carries a `links` object mapping logical endpoint
//! names to path templates such as `/prod/v1/{{gameDate}}/{{gameId}}_boxscore.json`.

use crate::http::HttpCache;
use crate::ids::SnapshotCache;
use crate::nba::Bootstrap;
use crate::{ApiConfig, ApiError, ApiResult, TeamId};
use std::sync::Arc;

/// Marker the origin puts in paths of documents refreshed every few seconds.
pub const SHORT_INTERVAL: &str = "10s";
/// Marker for the same documents refreshed every 15 minutes.
pub const LONG_INTERVAL: &str = "15m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TodayScoreboard,
    RosterPlayers,
    Teams,
    UngroupedStandings,
    ConferenceStandings,
    DivisionStandings,
    TeamLeaders,
    BoxScore,
    PlayoffsBracket,
}

impl Endpoint {
    /// Key of the template in the bootstrap `links` object.
    pub fn link_name(&self) -> &'static str {
        match self {
            Endpoint::TodayScoreboard => "todayScoreboard",
            Endpoint::RosterPlayers => "leagueRosterPlayers",
            Endpoint::Teams => "teams",
            Endpoint::UngroupedStandings => "leagueUngroupedStandings",
            Endpoint::ConferenceStandings => "leagueConfStandings",
            Endpoint::DivisionStandings => "leagueDivStandings",
            Endpoint::TeamLeaders => "teamLeaders",
            Endpoint::BoxScore => "boxscore",
            Endpoint::PlayoffsBracket => "playoffsBracket",
        }
    }

    /// The live scoreboard is the only way to tell whether a game is on right
    /// now, so it keeps the short polling interval.
    pub fn is_time_critical(&self) -> bool {
        matches!(self, Endpoint::TodayScoreboard)
    }
}

/// A path template with named `{placeholder}`s.
///
/// Upstream escapes braces by doubling them (`{{gameId}}`); parsing collapses
/// them back to single braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn parse(raw: &str) -> Self {
        Self { text: raw.replace("{{", "{").replace("}}", "}") }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Swap every occurrence of the short-interval marker for the 15 minute one.
    pub fn with_long_interval(self) -> Self {
        Self { text: self.text.replace(SHORT_INTERVAL, LONG_INTERVAL) }
    }

    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.text.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start + 1..].find('}') else {
                break;
            };
            names.push(&rest[start + 1..start + 1 + len]);
            rest = &rest[start + 1 + len + 1..];
        }
        names
    }

    /// Substitute placeholders. The first matching pair in `params` wins;
    /// unused pairs are ignored. Fails if any placeholder has no value.
    pub fn render(&self, params: &[(&str, &str)]) -> ApiResult<String> {
        let missing: Vec<&str> = self
            .placeholders()
            .into_iter()
            .filter(|name| !params.iter().any(|(key, _)| key == name))
            .collect();
        if !missing.is_empty() {
            return Err(ApiError::InvalidParameter(format!(
                "no value for {} in endpoint template {}",
                missing.join(", "),
                self.text
            )));
        }

        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start + 1..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + 1 + len];
            let value = params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .unwrap_or_default();
            out.push_str(&rest[..start]);
            out.push_str(value);
            rest = &rest[start + 1 + len + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Fetches the bootstrap document and hands out URL builders over it.
///
/// The parsed bootstrap is kept in memory and only re-decoded when the HTTP
/// layer reports new content.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    config: Arc<ApiConfig>,
    http: HttpCache,
    bootstrap: Arc<SnapshotCache<Bootstrap>>,
}

impl EndpointResolver {
    pub fn new(config: Arc<ApiConfig>, http: HttpCache) -> Self {
        Self { config, http, bootstrap: Arc::default() }
    }

    /// Today's endpoints. Build every URL of one operation from the same
    /// snapshot.
    pub async fn endpoints(&self) -> ApiResult<Endpoints> {
        let fetched = self.http.get(&self.config.bootstrap_url()).await?;
        let bootstrap = self.bootstrap.refresh(&fetched, |f| f.decode::<Bootstrap>())?;
        Ok(Endpoints { config: self.config.clone(), bootstrap })
    }

    pub fn bootstrap_cache(&self) -> &SnapshotCache<Bootstrap> {
        &self.bootstrap
    }
}

/// URL builder over one bootstrap snapshot.
#[derive(Debug, Clone)]
pub struct Endpoints {
    config: Arc<ApiConfig>,
    bootstrap: Arc<Bootstrap>,
}

impl Endpoints {
    pub fn new(config: Arc<ApiConfig>, bootstrap: Bootstrap) -> Self {
        Self { config, bootstrap: Arc::new(bootstrap) }
    }

    pub fn anchor_date(&self) -> Option<&str> {
        self.bootstrap.anchor_date()
    }

    /// Fully qualified URL for `endpoint`. `season` and `seasonScheduleYear`
    /// are filled in from the bootstrap unless the caller supplies them.
    pub fn url(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> ApiResult<String> {
        let raw = self.bootstrap.link(endpoint.link_name()).ok_or_else(|| {
            ApiError::malformed(
                "bootstrap document",
                format!("no `{}` link", endpoint.link_name()),
            )
        })?;

        let mut template = Template::parse(raw);
        if !endpoint.is_time_critical() {
            template = template.with_long_interval();
        }

        let season = self.bootstrap.season_schedule_year.map(|year| year.to_string());
        let mut all_params = params.to_vec();
        if let Some(season) = season.as_deref() {
            all_params.push(("season", season));
            all_params.push(("seasonScheduleYear", season));
        }

        let path = template.render(&all_params)?;
        Ok(self.config.url(&path))
    }

    pub fn scoreboard(&self) -> ApiResult<String> {
        self.url(Endpoint::TodayScoreboard, &[])
    }

    pub fn roster_players(&self) -> ApiResult<String> {
        self.url(Endpoint::RosterPlayers, &[])
    }

    pub fn teams(&self) -> ApiResult<String> {
        self.url(Endpoint::Teams, &[])
    }

    pub fn ungrouped_standings(&self) -> ApiResult<String> {
        self.url(Endpoint::UngroupedStandings, &[])
    }

    pub fn conference_standings(&self) -> ApiResult<String> {
        self.url(Endpoint::ConferenceStandings, &[])
    }

    pub fn division_standings(&self) -> ApiResult<String> {
        self.url(Endpoint::DivisionStandings, &[])
    }

    /// The feed accepts the numeric team id wherever it asks for a team URL code.
    pub fn team_leaders(&self, team_id: TeamId) -> ApiResult<String> {
        let code = team_id.to_string();
        self.url(Endpoint::TeamLeaders, &[("teamUrlCode", code.as_str())])
    }

    /// `game_date` is the scoreboard's eastern start date, `YYYYMMDD`.
    pub fn box_score(&self, game_date: &str, game_id: &str) -> ApiResult<String> {
        self.url(Endpoint::BoxScore, &[("gameDate", game_date), ("gameId", game_id)])
    }

    pub fn playoffs_bracket(&self) -> ApiResult<String> {
        self.url(Endpoint::PlayoffsBracket, &[])
    }
}
